//! Machine setup passed to the post-processor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::units::Units;

/// Work coordinate system selection (`G54`..`G59`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOffset {
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
}

impl Default for WorkOffset {
    fn default() -> Self {
        Self::G54
    }
}

impl fmt::Display for WorkOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::G54 => "G54",
            Self::G55 => "G55",
            Self::G56 => "G56",
            Self::G57 => "G57",
            Self::G58 => "G58",
            Self::G59 => "G59",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for WorkOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "G54" => Ok(Self::G54),
            "G55" => Ok(Self::G55),
            "G56" => Ok(Self::G56),
            "G57" => Ok(Self::G57),
            "G58" => Ok(Self::G58),
            "G59" => Ok(Self::G59),
            _ => Err(format!("Unknown work offset: {}", s)),
        }
    }
}

/// Program-level settings for post-processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSetup {
    /// Requested program units; `None` selects the dialect default
    pub units: Option<Units>,
    pub work_offset: WorkOffset,
    /// Clearance height above each toolpath's endpoints, in program units
    pub safety_height: f64,
    pub program_name: String,
    /// Number written in the `O<n>` program header
    pub program_number: u32,
}

impl Default for MachineSetup {
    fn default() -> Self {
        Self {
            units: None,
            work_offset: WorkOffset::G54,
            safety_height: 5.0,
            program_name: "CAMKIT".to_string(),
            program_number: 1000,
        }
    }
}

impl MachineSetup {
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_safety_height(mut self, safety_height: f64) -> Self {
        self.safety_height = safety_height;
        self
    }

    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn with_program_number(mut self, number: u32) -> Self {
        self.program_number = number;
        self
    }

    pub fn with_work_offset(mut self, offset: WorkOffset) -> Self {
        self.work_offset = offset;
        self
    }
}
