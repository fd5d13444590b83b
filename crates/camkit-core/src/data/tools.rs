//! Cutting tool records
//!
//! Reference data supplied by the tool library. The numeric id doubles as
//! the controller tool number used in `T<n>` and `H<n>` words.

use serde::{Deserialize, Serialize};

/// A cutting tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool number
    pub id: u32,
    /// Free text description written into tool-change comments
    pub description: String,
    /// Cutter diameter
    pub diameter: f64,
    /// Number of cutting flutes
    pub flutes: u32,
    /// Depth of cut per pass
    pub stepdown: f64,
    /// Spindle speed in RPM
    pub rpm: f64,
    /// Plunge feed rate
    pub plunge_rate: f64,
    /// Cutting feed rate
    pub feedrate: f64,
}

impl Tool {
    /// Create a tool with the given number and diameter
    ///
    /// Remaining parameters use conservative defaults for a two-flute
    /// flat end mill.
    pub fn new(id: u32, diameter: f64) -> Self {
        Self {
            id,
            description: format!("{}mm End Mill", diameter),
            diameter,
            flutes: 2,
            stepdown: diameter / 2.0,
            rpm: 12000.0,
            plunge_rate: 300.0,
            feedrate: 1000.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_flutes(mut self, flutes: u32) -> Self {
        self.flutes = flutes;
        self
    }

    pub fn with_stepdown(mut self, stepdown: f64) -> Self {
        self.stepdown = stepdown;
        self
    }

    pub fn with_rpm(mut self, rpm: f64) -> Self {
        self.rpm = rpm;
        self
    }

    pub fn with_feedrate(mut self, feedrate: f64) -> Self {
        self.feedrate = feedrate;
        self
    }

    pub fn with_plunge_rate(mut self, plunge_rate: f64) -> Self {
        self.plunge_rate = plunge_rate;
        self
    }
}

impl Default for Tool {
    fn default() -> Self {
        Tool::new(1, 6.0)
    }
}
