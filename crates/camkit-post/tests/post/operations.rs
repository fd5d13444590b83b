use camkit_core::{
    CoolantKind, MachineSetup, Operation, OperationKind, Point3, PostError, SpindleDirection,
    Tool, Toolpath, Units,
};
use camkit_post::{DialectKind, ProgramGenerator};

fn square() -> Toolpath {
    Toolpath::with_points(
        3,
        Units::MM,
        vec![
            Point3::new(0.0, 0.0, -2.0),
            Point3::new(20.0, 0.0, -2.0),
            Point3::new(20.0, 20.0, -2.0),
            Point3::new(0.0, 20.0, -2.0),
        ],
    )
}

fn grbl() -> ProgramGenerator {
    ProgramGenerator::for_kind(DialectKind::Grbl, MachineSetup::default())
}

#[test]
fn test_empty_input_is_rejected() {
    assert_eq!(grbl().generate(&[], &[]), Err(PostError::EmptyToolpath));
    assert_eq!(
        grbl().generate(&[Toolpath::new(1, Units::MM)], &[]),
        Err(PostError::EmptyToolpath)
    );
}

#[test]
fn test_span_out_of_range() {
    let tp = square();
    let op = Operation::new(OperationKind::Contour, tp.id.clone())
        .with_name("Outline")
        .with_span(2..9);
    let err = grbl().generate(&[tp], &[op]).unwrap_err();
    assert!(matches!(
        err,
        PostError::SpanOutOfRange { ref operation, start: 2, end: 9, len: 4, .. } if operation == "Outline"
    ));
}

#[test]
fn test_operation_parameters_drive_spindle_feed_and_coolant() {
    let tp = square();
    let op = Operation::new(OperationKind::Pocket, tp.id.clone())
        .with_feedrate(750.0)
        .with_spindle(9000.0, SpindleDirection::CounterClockwise)
        .with_coolant(CoolantKind::Mist);
    let program = grbl().generate(&[tp], &[op]).unwrap();
    let lines: Vec<&str> = program.lines().collect();

    let spindle = lines.iter().position(|l| *l == "S9000 M4").unwrap();
    assert_eq!(lines[spindle + 1], "M7");
    let feed = lines.iter().position(|l| *l == "F750.000").unwrap();
    assert_eq!(lines[feed - 1], "G1 X0.000 Y0.000 Z-2.000");
    assert_eq!(lines[feed + 1], "G1 X20.000 Y0.000 Z-2.000");
    assert_eq!(&lines[lines.len() - 3..], &["M5", "M9", "M30"]);
}

#[test]
fn test_feed_reemitted_when_operation_feed_changes() {
    let tp = square();
    let ops = vec![
        Operation::new(OperationKind::Rough, tp.id.clone())
            .with_span(0..2)
            .with_feedrate(500.0),
        Operation::new(OperationKind::Contour, tp.id.clone())
            .with_span(2..4)
            .with_feedrate(250.0),
    ];
    let program = grbl().generate(&[tp], &ops).unwrap();
    let feeds: Vec<&str> = program.lines().filter(|l| l.starts_with('F')).collect();
    assert_eq!(feeds, vec!["F300.000", "F500.000", "F250.000"]);

    let lines: Vec<&str> = program.lines().collect();
    let change = lines.iter().position(|l| *l == "F250.000").unwrap();
    assert_eq!(lines[change - 1], "G1 X20.000 Y0.000 Z-2.000");
    assert_eq!(lines[change + 1], "G1 X20.000 Y20.000 Z-2.000");
}

#[test]
fn test_operations_for_other_toolpaths_are_ignored() {
    let a = square();
    let b = Toolpath::with_points(
        4,
        Units::MM,
        vec![Point3::new(5.0, 5.0, -1.0), Point3::new(8.0, 5.0, -1.0)],
    );
    let op = Operation::new(OperationKind::Cut, b.id.clone()).with_feedrate(123.0);
    let program = grbl().generate(&[a, b], &[op]).unwrap();

    let t3 = program.find("\nT3\n").unwrap();
    let t4 = program.find("\nT4\n").unwrap();
    assert!(t3 < t4);
    assert!(program[t4..].contains("F123.000"));
    assert!(!program[..t4].contains("F123.000"));
}

#[test]
fn test_each_toolpath_has_full_sequence() {
    let program = grbl()
        .generate(&[square(), square()], &[])
        .unwrap();
    assert_eq!(program.matches("\nM5\n").count(), 2);
    assert_eq!(program.lines().filter(|l| l.starts_with("S")).count(), 2);
    assert_eq!(program.lines().filter(|l| l.starts_with("G0 ")).count(), 4);
}

#[test]
fn test_plunge_uses_tool_plunge_rate() {
    let program = grbl()
        .with_tools([Tool::new(3, 6.0).with_plunge_rate(123.0)])
        .generate(&[square()], &[])
        .unwrap();
    let lines: Vec<&str> = program.lines().collect();

    let plunge = lines.iter().position(|l| l.starts_with("G1 ")).unwrap();
    assert_eq!(lines[plunge], "G1 X0.000 Y0.000 Z-2.000");
    assert_eq!(lines[plunge - 1], "F123.000");
    assert_eq!(lines[plunge + 1], "F1000.000");
    assert_eq!(lines[plunge + 2], "G1 X20.000 Y0.000 Z-2.000");
    assert_eq!(program.matches("F123.000").count(), 1);
}

#[test]
fn test_plunge_feed_follows_program_units() {
    let program = ProgramGenerator::for_kind(DialectKind::Haas, MachineSetup::default())
        .with_tools([Tool::new(3, 6.0).with_plunge_rate(254.0)])
        .generate(&[square()], &[])
        .unwrap();
    let lines: Vec<&str> = program.lines().collect();
    let plunge = lines.iter().position(|l| l.starts_with("G1 ")).unwrap();
    assert_eq!(lines[plunge - 1], "F10.0000");
}
