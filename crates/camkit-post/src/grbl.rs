//! GRBL dialect
//!
//! Always metric: inch setups are converted. No tool-length compensation,
//! no tape delimiters and an explicit `G1` on every cutting move.

use camkit_core::{MachineSetup, Tool, Units, WorkOffset};

use crate::dialect::{comment, Dialect, DialectKind};
use crate::sanitizer::{SanitizerConfig, DEFAULT_MAX_LINE_LENGTH};

#[derive(Debug, Clone, Default)]
pub struct GrblDialect;

impl GrblDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for GrblDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Grbl
    }

    fn name(&self) -> &str {
        "GRBL"
    }

    fn default_units(&self) -> Units {
        Units::MM
    }

    fn resolve_units(&self, _requested: Option<Units>) -> Units {
        Units::MM
    }

    fn precision(&self) -> usize {
        3
    }

    fn sanitizer(&self) -> SanitizerConfig {
        SanitizerConfig {
            collapse_motion_words: false,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    fn header(&self, setup: &MachineSetup, _units: Units) -> Vec<String> {
        let mut lines = vec![
            "G21 G90 G17 G40".to_string(),
            comment(&setup.program_name, 32),
        ];
        if setup.work_offset != WorkOffset::G54 {
            lines.push(setup.work_offset.to_string());
        }
        lines
    }

    fn footer(&self, _setup: &MachineSetup) -> Vec<String> {
        vec!["M30".to_string()]
    }

    /// GRBL has no tool changer; the `T` word is informational
    fn tool_change(&self, tool: &Tool) -> Vec<String> {
        vec![
            comment(&format!("Tool {} - {}", tool.id, tool.description), 40),
            format!("T{}", tool.id),
        ]
    }
}
