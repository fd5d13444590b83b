use camkit_core::{MachineSetup, Point3, Tool, Toolpath, Units, WorkOffset};
use camkit_parser::GcodeParser;
use camkit_post::{DialectKind, ProgramGenerator};

fn scenario_toolpath() -> Toolpath {
    GcodeParser::new()
        .parse("G21 G90 T1 M6 G0 X0 Y0 Z5 G1 Z-1 F100 G1 X10 Y0 F200 M30")
        .toolpaths
        .remove(0)
}

fn lines(program: &str) -> Vec<&str> {
    program.lines().collect()
}

#[test]
fn test_grbl_program_shape() {
    let program = ProgramGenerator::for_kind(DialectKind::Grbl, MachineSetup::default())
        .generate(&[scenario_toolpath()], &[])
        .unwrap();
    let lines = lines(&program);

    assert!(lines[0].starts_with("G21"));
    assert_eq!(&lines[lines.len() - 2..], &["M5", "M30"]);
    assert!(!lines.iter().any(|l| l.trim() == "%"));
    assert!(!lines.iter().any(|l| l.starts_with("G43")));
    assert!(lines.contains(&"G1 X10.000 Y0.000 Z-1.000"));
    // Cutting moves always carry their G1 word
    assert!(!lines
        .iter()
        .any(|l| l.starts_with('X') || l.starts_with('Y') || l.starts_with('Z')));
}

#[test]
fn test_grbl_converts_inch_setups_to_metric() {
    let tp = Toolpath::with_points(1, Units::INCH, vec![Point3::new(1.0, 2.0, -0.5)]);
    let setup = MachineSetup::default()
        .with_units(Units::INCH)
        .with_safety_height(0.2);
    let program = ProgramGenerator::for_kind(DialectKind::Grbl, setup)
        .generate(&[tp], &[])
        .unwrap();
    assert!(program.starts_with("G21"));
    assert!(!program.contains("G20"));
    assert!(program.contains("G1 X25.400 Y50.800 Z-12.700"));
    // Safety height converted along with the coordinates
    assert!(program.contains("G0 X25.400 Y50.800 Z-7.620"));
}

#[test]
fn test_fanuc_defaults_to_inches_with_length_compensation() {
    let program = ProgramGenerator::for_kind(DialectKind::Fanuc, MachineSetup::default())
        .with_tools([Tool::new(1, 6.0).with_description("Flat endmill")])
        .generate(&[scenario_toolpath()], &[])
        .unwrap();
    let lines = lines(&program);

    assert_eq!(lines[0], "%");
    assert_eq!(lines[1], "O1000 (CAMKIT)");
    assert!(lines.iter().any(|l| l.starts_with("G20 ")));
    assert!(lines.contains(&"T1 M6"));
    assert!(lines.contains(&"G43 H1"));
    assert!(lines.contains(&"(T1 - FLAT ENDMILL)"));
    // 10 mm -> 0.3937 in, trailing zeros trimmed
    assert!(program.contains("X.3937") || program.contains("X0.3937"));
    assert_eq!(*lines.last().unwrap(), "%");
}

#[test]
fn test_fanuc_collapses_repeated_motion_words() {
    let tp = Toolpath::with_points(
        1,
        Units::MM,
        vec![
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(10.0, 0.0, -1.0),
            Point3::new(10.0, 10.0, -1.0),
        ],
    );
    let setup = MachineSetup::default().with_units(Units::MM);
    let program = ProgramGenerator::for_kind(DialectKind::Fanuc, setup)
        .generate(&[tp], &[])
        .unwrap();
    assert!(program.contains("\nF300.\nG1 X0. Y0. Z-1.\nF1000.\nX10. Y0. Z-1.\nX10. Y10. Z-1.\n"));
}

#[test]
fn test_haas_safety_block_and_work_offset() {
    let setup = MachineSetup::default()
        .with_units(Units::MM)
        .with_program_number(42)
        .with_program_name("Bracket (rev b)")
        .with_work_offset(WorkOffset::G55);
    let program = ProgramGenerator::for_kind(DialectKind::Haas, setup)
        .generate(&[scenario_toolpath()], &[])
        .unwrap();
    let lines = lines(&program);

    assert_eq!(lines[0], "%");
    assert_eq!(lines[1], "O00042 (BRACKET  REV B)");
    assert_eq!(lines[2], "G21 G17 G40 G49 G80 G90");
    assert_eq!(lines[3], "G55");
    assert!(lines.contains(&"G43 H1"));
    assert!(program.contains("X10.0000 Y0.0000 Z-1.0000"));
    assert_eq!(&lines[lines.len() - 2..], &["M30", "%"]);
}

#[test]
fn test_haas_defaults_to_inches_and_always_emits_offset() {
    let program = ProgramGenerator::for_kind(DialectKind::Haas, MachineSetup::default())
        .generate(&[scenario_toolpath()], &[])
        .unwrap();
    assert!(program.contains("\nG20 G17 G40 G49 G80 G90\nG54\n"));
}

#[test]
fn test_no_line_exceeds_column_limit() {
    let setup = MachineSetup::default().with_program_name(
        "a very long program name that would never fit on a single controller line",
    );
    for kind in DialectKind::all() {
        let program = ProgramGenerator::for_kind(*kind, setup.clone())
            .with_tools([Tool::new(1, 6.0).with_description(
                "an equally verbose tool description that keeps going and going",
            )])
            .generate(&[scenario_toolpath()], &[])
            .unwrap();
        assert!(program.lines().all(|l| l.len() <= 80), "{}", kind);
        assert!(program.lines().all(|l| !l.trim().is_empty()), "{}", kind);
    }
}
