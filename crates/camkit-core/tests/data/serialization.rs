use camkit_core::{
    BinaryEntity, CoolantKind, Operation, OperationKind, Point3, Toolpath, ToolpathSet, Units,
};

#[test]
fn test_toolpath_set_json_preserves_order_and_units() {
    let set: ToolpathSet = vec![
        Toolpath::with_points(1, Units::MM, vec![Point3::new(0.0, 0.0, 5.0)]),
        Toolpath::with_points(
            2,
            Units::INCH,
            vec![Point3::new(1.0, 2.0, -0.1).with_feed_rate(20.0)],
        ),
    ]
    .into();

    let json = serde_json::to_string(&set).unwrap();
    let back: ToolpathSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
    assert_eq!(back[1].units, Units::INCH);
    assert!(json.contains("\"inch\""));
}

#[test]
fn test_point_without_optional_axes_omits_them() {
    let json = serde_json::to_string(&Point3::new(1.0, 2.0, 3.0)).unwrap();
    assert!(!json.contains("feed_rate"));
    assert!(!json.contains("\"a\""));
}

#[test]
fn test_operation_defaults_from_json() {
    let op: Operation = serde_json::from_str(
        r#"{"id":"op1","name":"Face","kind":"pocket","toolpath_id":"tp-1","coolant":"flood"}"#,
    )
    .unwrap();
    assert_eq!(op.kind, OperationKind::Pocket);
    assert_eq!(op.toolpath_id.0, "tp-1");
    assert_eq!(op.span, None);
    assert_eq!(op.coolant, Some(CoolantKind::Flood));
}

#[test]
fn test_entity_tagging() {
    let entity = BinaryEntity::Point {
        position: Point3::new(1.0, 1.0, 0.0),
    };
    let json = serde_json::to_string(&entity).unwrap();
    assert!(json.contains("\"type\":\"point\""));
}
