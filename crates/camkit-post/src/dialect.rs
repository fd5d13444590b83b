//! Controller dialect capabilities
//!
//! A [`Dialect`] supplies every controller-specific block the program
//! generator needs, plus capability queries (units, precision, forced
//! retracts, line sanitizing) so the generator itself stays dialect-free.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use camkit_core::{CoolantKind, MachineSetup, SpindleDirection, Tool, Units};

use crate::fanuc::FanucDialect;
use crate::grbl::GrblDialect;
use crate::haas::HaasDialect;
use crate::sanitizer::SanitizerConfig;

/// Available controller dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Fanuc,
    Haas,
    Grbl,
}

impl DialectKind {
    pub fn all() -> &'static [DialectKind] {
        &[DialectKind::Fanuc, DialectKind::Haas, DialectKind::Grbl]
    }

    /// Instantiate the dialect
    pub fn build(&self) -> Box<dyn Dialect> {
        match self {
            DialectKind::Fanuc => Box::new(FanucDialect::new()),
            DialectKind::Haas => Box::new(HaasDialect::new()),
            DialectKind::Grbl => Box::new(GrblDialect::new()),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialectKind::Fanuc => write!(f, "fanuc"),
            DialectKind::Haas => write!(f, "haas"),
            DialectKind::Grbl => write!(f, "grbl"),
        }
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fanuc" | "generic" => Ok(DialectKind::Fanuc),
            "haas" => Ok(DialectKind::Haas),
            "grbl" => Ok(DialectKind::Grbl),
            _ => Err(format!("Unknown dialect: {}", s)),
        }
    }
}

/// Controller-specific encoding
pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    fn name(&self) -> &str;

    /// Units used when the setup does not request any
    fn default_units(&self) -> Units;

    /// Program units for a requested setting
    fn resolve_units(&self, requested: Option<Units>) -> Units {
        requested.unwrap_or_else(|| self.default_units())
    }

    /// Decimal places for coordinates and feeds
    fn precision(&self) -> usize;

    fn trims_trailing_zeros(&self) -> bool {
        false
    }

    fn format_number(&self, value: f64) -> String {
        format_number(value, self.precision(), self.trims_trailing_zeros())
    }

    /// Force a retract after every `n` operations
    fn retract_every(&self) -> Option<usize> {
        None
    }

    /// Line clean-up applied to the finished program
    fn sanitizer(&self) -> SanitizerConfig;

    fn header(&self, setup: &MachineSetup, units: Units) -> Vec<String>;

    fn footer(&self, setup: &MachineSetup) -> Vec<String>;

    fn tool_change(&self, tool: &Tool) -> Vec<String>;

    fn spindle_on(&self, speed: f64, direction: SpindleDirection) -> String {
        let code = match direction {
            SpindleDirection::Clockwise => "M3",
            SpindleDirection::CounterClockwise => "M4",
        };
        format!("S{:.0} {}", speed, code)
    }

    fn spindle_off(&self) -> String {
        "M5".to_string()
    }

    fn feedrate_command(&self, feedrate: f64) -> String {
        format!("F{}", self.format_number(feedrate))
    }

    fn coolant_on(&self, kind: CoolantKind) -> String {
        match kind {
            CoolantKind::Flood => "M8".to_string(),
            CoolantKind::Mist => "M7".to_string(),
        }
    }

    fn coolant_off(&self) -> String {
        "M9".to_string()
    }

    fn rapid_move(&self, x: f64, y: f64, z: f64) -> String {
        format!(
            "G0 X{} Y{} Z{}",
            self.format_number(x),
            self.format_number(y),
            self.format_number(z)
        )
    }

    fn linear_move(&self, x: f64, y: f64, z: f64) -> String {
        format!(
            "G1 X{} Y{} Z{}",
            self.format_number(x),
            self.format_number(y),
            self.format_number(z)
        )
    }
}

/// Format a number with fixed places, optionally trimming trailing zeros
///
/// Negative zero is written as zero. Trimmed values keep their decimal
/// point (`10.`), which every supported controller reads as a real number.
pub fn format_number(value: f64, precision: usize, trim_zeros: bool) -> String {
    let mut text = format!("{:.*}", precision, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }
    if trim_zeros && text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
    }
    text
}

/// Wrap free text as a controller comment
///
/// Parentheses inside the text would end the comment early, so they are
/// replaced. The text is upper-cased and cut to `max_len` characters.
pub fn comment(text: &str, max_len: usize) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| match c {
            '(' | ')' | ';' => ' ',
            c => c.to_ascii_uppercase(),
        })
        .take(max_len)
        .collect();
    format!("({})", cleaned.trim())
}
