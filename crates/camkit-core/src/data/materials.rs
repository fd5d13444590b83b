//! Stock material records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock material with chip-load reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Chip load per tooth (length per flute per revolution)
    pub feed_per_tooth: f64,
    /// Relative hardness, informational only
    pub hardness: f64,
}

impl Material {
    pub fn new(name: impl Into<String>, feed_per_tooth: f64) -> Self {
        Self {
            name: name.into(),
            feed_per_tooth,
            hardness: 0.0,
        }
    }

    pub fn with_hardness(mut self, hardness: f64) -> Self {
        self.hardness = hardness;
        self
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} per tooth)", self.name, self.feed_per_tooth)
    }
}
