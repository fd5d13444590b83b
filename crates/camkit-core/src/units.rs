//! Unit systems
//!
//! Handles conversion between metric (mm) and imperial (inch) coordinates
//! and the G-code words that select them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Linear unit system of a toolpath or program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (metric)
    MM,
    /// Inches (imperial)
    INCH,
}

impl Default for Units {
    fn default() -> Self {
        Self::MM
    }
}

impl Units {
    /// Convert a value from one unit to another
    ///
    /// # Arguments
    /// * `value` - The value to convert
    /// * `from` - The unit of the input value
    /// * `to` - The target unit
    pub fn convert(value: f64, from: Units, to: Units) -> f64 {
        match (from, to) {
            (Units::MM, Units::INCH) => value / MM_PER_INCH,
            (Units::INCH, Units::MM) => value * MM_PER_INCH,
            _ => value,
        }
    }

    /// The G-code word selecting this unit system (`G20` / `G21`).
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::MM => "G21",
            Units::INCH => "G20",
        }
    }

    /// Human readable name used in program comments.
    pub fn label(&self) -> &'static str {
        match self {
            Units::MM => "MILLIMETERS",
            Units::INCH => "INCHES",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "metric" | "g21" => Ok(Units::MM),
            "in" | "inch" | "imperial" | "g20" => Ok(Units::INCH),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}
