use camkit_core::{Point3, Units};
use camkit_parser::{GcodeParser, ParserConfig};

fn xyz(p: &Point3) -> (f64, f64, f64) {
    (p.x, p.y, p.z)
}

#[test]
fn test_single_line_program() {
    let program =
        GcodeParser::new().parse("G21 G90 T1 M6 G0 X0 Y0 Z5 G1 Z-1 F100 G1 X10 Y0 F200 M30");

    assert_eq!(program.toolpaths.len(), 1);
    assert_eq!(program.units, Units::MM);
    let tp = &program.toolpaths[0];
    assert_eq!(tp.tool_number, 1);
    assert_eq!(tp.units, Units::MM);
    let pts: Vec<_> = tp.points.iter().map(xyz).collect();
    assert_eq!(pts, vec![(0.0, 0.0, 5.0), (0.0, 0.0, -1.0), (10.0, 0.0, -1.0)]);
    assert_eq!(tp.points[0].feed_rate, None);
    assert_eq!(tp.points[1].feed_rate, Some(100.0));
    assert_eq!(tp.points[2].feed_rate, Some(200.0));
}

#[test]
fn test_tool_change_splits_toolpaths() {
    let text = "\
T1 M6
G0 X0 Y0 Z5
G1 Z-1 F100
T2 M6
G0 X20 Y20
G1 Z-2
";
    let program = GcodeParser::new().parse(text);
    assert_eq!(program.toolpaths.len(), 2);
    assert_eq!(program.toolpaths[0].tool_number, 1);
    assert_eq!(program.toolpaths[0].len(), 2);
    assert_eq!(program.toolpaths[1].tool_number, 2);
    // Z carries over from the previous toolpath
    assert_eq!(xyz(&program.toolpaths[1].points[0]), (20.0, 20.0, -1.0));
    assert_eq!(xyz(&program.toolpaths[1].points[1]), (20.0, 20.0, -2.0));
}

#[test]
fn test_consecutive_tool_changes_discard_empty_toolpaths() {
    let program = GcodeParser::new().parse("T1\nT2\nT3\nG1 X1\n");
    assert_eq!(program.toolpaths.len(), 1);
    assert_eq!(program.toolpaths[0].tool_number, 3);
}

#[test]
fn test_no_motion_yields_empty_list() {
    let program = GcodeParser::new().parse("%\nO1000\n(header)\nM3 S1000\nM5\nM30\n%\n");
    assert!(program.toolpaths.is_empty());
    assert!(program.warnings.is_empty());
}

#[test]
fn test_initial_tool_is_one() {
    let program = GcodeParser::new().parse("G1 X1 Y1");
    assert_eq!(program.toolpaths[0].tool_number, 1);
}

#[test]
fn test_m30_closes_toolpath_when_enabled() {
    let text = "G1 X1\nM30\nG1 X2\n";
    let program = GcodeParser::new().parse(text);
    assert_eq!(program.toolpaths.len(), 2);

    let config = ParserConfig {
        m30_closes_toolpath: false,
        ..ParserConfig::default()
    };
    let program = GcodeParser::with_config(config).parse(text);
    assert_eq!(program.toolpaths.len(), 1);
    assert_eq!(program.toolpaths[0].len(), 2);
}

#[test]
fn test_no_toolpath_is_ever_empty() {
    let text = "T1\nM30\nT2\nG20\nG21\nT5\nG0 X1\nM30\nM30\n";
    let program = GcodeParser::new().parse(text);
    assert!(program.toolpaths.iter().all(|tp| !tp.is_empty()));
    assert_eq!(program.toolpaths.len(), 1);
}

#[test]
fn test_units_switch_closes_toolpath() {
    let text = "G21\nG1 X10\nG20\nG1 X1\n";
    let program = GcodeParser::new().parse(text);
    assert_eq!(program.toolpaths.len(), 2);
    assert_eq!(program.toolpaths[0].units, Units::MM);
    assert_eq!(program.toolpaths[1].units, Units::INCH);
    assert_eq!(program.units, Units::INCH);
}

#[test]
fn test_units_switch_before_motion_keeps_single_toolpath() {
    let program = GcodeParser::new().parse("G20\nG0 X1 Y1\nG1 Z-0.1");
    assert_eq!(program.toolpaths.len(), 1);
    assert_eq!(program.toolpaths[0].units, Units::INCH);
}
