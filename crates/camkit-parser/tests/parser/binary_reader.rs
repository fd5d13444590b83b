use camkit_core::{BinaryEntity, FileFormatError, Units};
use camkit_parser::{
    BinaryContents, BinaryToolpathReader, GEOMETRY_MAGIC, HEADER_LEN, TOOLPATH_MAGIC,
};
use proptest::prelude::*;

fn header(magic: &[u8; 4], units: u8) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN];
    buf[..4].copy_from_slice(magic);
    buf[4..6].copy_from_slice(&2u16.to_le_bytes());
    buf[6] = units;
    buf
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

#[test]
fn test_reads_line_arc_and_point_records() {
    let mut buf = header(GEOMETRY_MAGIC, 1);
    buf.push(0x01);
    push_f32s(&mut buf, &[0.0, 0.0, 0.0, 10.0, 5.0, -1.0]);
    buf.push(0x02);
    push_f32s(&mut buf, &[1.0, 2.0, 0.0, 3.0, 0.0, 1.5, 0.0, 0.0, 1.0]);
    buf.push(0x04);
    push_f32s(&mut buf, &[7.0, 8.0, 9.0]);

    let file = BinaryToolpathReader::new().read_entities(&buf).unwrap();
    assert_eq!(file.version, 2);
    assert_eq!(file.units, Units::MM);
    assert_eq!(file.skipped_records, 0);
    assert_eq!(file.entities.len(), 3);

    match &file.entities[0] {
        BinaryEntity::Line { start, end } => {
            assert_eq!(start.x, 0.0);
            assert_eq!((end.x, end.y, end.z), (10.0, 5.0, -1.0));
        }
        other => panic!("expected line, got {:?}", other),
    }
    match &file.entities[1] {
        BinaryEntity::Arc(arc) => {
            assert_eq!(arc.radius, 3.0);
            assert_eq!(arc.end_angle, 1.5);
            assert_eq!(arc.normal.z, 1.0);
        }
        other => panic!("expected arc, got {:?}", other),
    }
    assert!(matches!(file.entities[2], BinaryEntity::Point { .. }));
}

#[test]
fn test_unknown_tag_is_skipped() {
    let mut buf = header(GEOMETRY_MAGIC, 0);
    buf.push(0x7f);
    buf.extend_from_slice(&[0xAA; 4]);
    buf.push(0x04);
    push_f32s(&mut buf, &[1.0, 2.0, 3.0]);

    let file = BinaryToolpathReader::new().read_entities(&buf).unwrap();
    assert_eq!(file.units, Units::INCH);
    assert_eq!(file.skipped_records, 1);
    assert_eq!(file.entities.len(), 1);
}

#[test]
fn test_invalid_signature() {
    let mut buf = header(b"ABCD", 1);
    buf.push(0x04);
    let err = BinaryToolpathReader::new().read(&buf).unwrap_err();
    assert!(matches!(err, FileFormatError::InvalidSignature { ref found, .. } if found == "ABCD"));
    assert!(err.to_string().contains("Invalid signature"));
}

#[test]
fn test_truncated_record_discards_everything() {
    let mut buf = header(GEOMETRY_MAGIC, 1);
    buf.push(0x04);
    push_f32s(&mut buf, &[1.0, 2.0, 3.0]);
    buf.push(0x01);
    push_f32s(&mut buf, &[0.0, 0.0]);

    let err = BinaryToolpathReader::new().read(&buf).unwrap_err();
    assert_eq!(
        err,
        FileFormatError::TruncatedData {
            offset: HEADER_LEN + 13,
            needed: 25,
            available: 9,
        }
    );
}

#[test]
fn test_reads_tool_runs() {
    let mut buf = header(TOOLPATH_MAGIC, 1);
    buf.extend_from_slice(&3u32.to_le_bytes());
    buf.extend_from_slice(&2u32.to_le_bytes());
    push_f32s(&mut buf, &[0.0, 0.0, 5.0, 0.0, 10.0, 0.0, -1.0, 400.0]);
    buf.extend_from_slice(&7u32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_f32s(&mut buf, &[1.0, 1.0, 1.0, 200.0]);

    let contents = BinaryToolpathReader::new().read(&buf).unwrap();
    let BinaryContents::Toolpaths(file) = contents else {
        panic!("expected toolpath runs");
    };
    assert_eq!(file.toolpaths.len(), 2);
    assert_eq!(file.toolpaths[0].tool_number, 3);
    assert_eq!(file.toolpaths[0].points[1].feed_rate, Some(400.0));
    assert_eq!(file.toolpaths[1].tool_number, 7);
    assert_eq!(file.toolpaths[1].units, Units::MM);
}

#[test]
fn test_truncated_run() {
    let mut buf = header(TOOLPATH_MAGIC, 1);
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&3u32.to_le_bytes());
    push_f32s(&mut buf, &[0.0, 0.0, 0.0, 100.0]);

    let err = BinaryToolpathReader::new().read_toolpaths(&buf).unwrap_err();
    assert!(matches!(
        err,
        FileFormatError::TruncatedData { offset, needed: 56, .. } if offset == HEADER_LEN
    ));
}

proptest! {
    #[test]
    fn prop_short_buffers_are_truncated(data in proptest::collection::vec(any::<u8>(), 0..HEADER_LEN)) {
        let result = BinaryToolpathReader::new().read(&data);
        let is_truncated = matches!(result, Err(FileFormatError::TruncatedData { .. }));
        prop_assert!(is_truncated);
    }

    #[test]
    fn prop_arbitrary_record_bytes_never_panic(body in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut buf = header(GEOMETRY_MAGIC, 1);
        buf.extend_from_slice(&body);
        let _ = BinaryToolpathReader::new().read(&buf);

        let mut buf = header(TOOLPATH_MAGIC, 1);
        buf.extend_from_slice(&body);
        let _ = BinaryToolpathReader::new().read(&buf);
    }
}
