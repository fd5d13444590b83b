//! Fanuc (generic) dialect
//!
//! Imperial by default, `%` tape delimiters around an `O<n>` program,
//! tool-length compensation on every tool change and numbers written with
//! trailing zeros trimmed (`10.`). Long runs get a forced retract every
//! [`FANUC_RETRACT_INTERVAL`] operations.

use camkit_core::{MachineSetup, Tool, Units, WorkOffset};

use crate::dialect::{comment, Dialect, DialectKind};
use crate::sanitizer::{SanitizerConfig, DEFAULT_MAX_LINE_LENGTH};

/// Operations between forced retracts
pub const FANUC_RETRACT_INTERVAL: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct FanucDialect;

impl FanucDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for FanucDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Fanuc
    }

    fn name(&self) -> &str {
        "Fanuc"
    }

    fn default_units(&self) -> Units {
        Units::INCH
    }

    fn precision(&self) -> usize {
        4
    }

    fn trims_trailing_zeros(&self) -> bool {
        true
    }

    fn retract_every(&self) -> Option<usize> {
        Some(FANUC_RETRACT_INTERVAL)
    }

    fn sanitizer(&self) -> SanitizerConfig {
        SanitizerConfig {
            collapse_motion_words: true,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    fn header(&self, setup: &MachineSetup, units: Units) -> Vec<String> {
        let mut lines = vec![
            "%".to_string(),
            format!("O{} {}", setup.program_number, comment(&setup.program_name, 32)),
            comment(&format!("UNITS: {}", units.label()), 40),
            format!("{} G90 G94 G17 G40 G49 G80", units.gcode()),
            "G53 G0 Z0.".to_string(),
        ];
        if setup.work_offset != WorkOffset::G54 {
            lines.push(setup.work_offset.to_string());
        }
        lines
    }

    fn footer(&self, _setup: &MachineSetup) -> Vec<String> {
        vec![
            "G91 G28 Z0.".to_string(),
            "G90".to_string(),
            "M30".to_string(),
            "%".to_string(),
        ]
    }

    fn tool_change(&self, tool: &Tool) -> Vec<String> {
        vec![
            comment(&format!("T{} - {}", tool.id, tool.description), 40),
            format!("T{} M6", tool.id),
            format!("G43 H{}", tool.id),
        ]
    }
}
