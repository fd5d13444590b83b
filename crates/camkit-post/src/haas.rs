//! Haas dialect
//!
//! Metric or imperial per setup (imperial when unset). Every program opens
//! with a safety block and an explicit work offset.

use camkit_core::{MachineSetup, Tool, Units};

use crate::dialect::{comment, Dialect, DialectKind};
use crate::sanitizer::{SanitizerConfig, DEFAULT_MAX_LINE_LENGTH};

#[derive(Debug, Clone, Default)]
pub struct HaasDialect;

impl HaasDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for HaasDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Haas
    }

    fn name(&self) -> &str {
        "Haas"
    }

    fn default_units(&self) -> Units {
        Units::INCH
    }

    fn precision(&self) -> usize {
        4
    }

    fn sanitizer(&self) -> SanitizerConfig {
        SanitizerConfig {
            collapse_motion_words: true,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    fn header(&self, setup: &MachineSetup, units: Units) -> Vec<String> {
        vec![
            "%".to_string(),
            format!("O{:05} {}", setup.program_number, comment(&setup.program_name, 32)),
            format!("{} G17 G40 G49 G80 G90", units.gcode()),
            setup.work_offset.to_string(),
        ]
    }

    fn footer(&self, _setup: &MachineSetup) -> Vec<String> {
        vec![
            "G28 G91 Z0.".to_string(),
            "G90".to_string(),
            "M30".to_string(),
            "%".to_string(),
        ]
    }

    fn tool_change(&self, tool: &Tool) -> Vec<String> {
        vec![
            format!("T{} M6 {}", tool.id, comment(&tool.description, 32)),
            format!("G43 H{}", tool.id),
        ]
    }
}
