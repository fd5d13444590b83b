//! Data models for CamKit
//!
//! Value types shared by every stage of the toolpath pipeline:
//! points, toolpaths, tools, materials, operations and machine setup.

pub mod entity;
pub mod machine;
pub mod materials;
pub mod operation;
pub mod tools;
pub mod toolpath;

use serde::{Deserialize, Serialize};

pub use entity::{ArcEntity, BinaryEntity};
pub use machine::{MachineSetup, WorkOffset};
pub use materials::Material;
pub use operation::{CoolantKind, GeneratedToolpath, Operation, OperationKind, SpindleDirection};
pub use tools::Tool;
pub use toolpath::{Toolpath, ToolpathId, ToolpathSet};

use crate::units::Units;

/// A tool-tip position in the active unit system
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
    /// Optional rotary A-axis position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    /// Feed rate in effect when this point was reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_rate: Option<f64>,
}

impl Point3 {
    /// Create a point with no rotary axis and no feed rate
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            a: None,
            feed_rate: None,
        }
    }

    /// Return a copy carrying the given feed rate
    pub fn with_feed_rate(mut self, feed_rate: f64) -> Self {
        self.feed_rate = Some(feed_rate);
        self
    }

    /// Return a copy with linear axes converted between unit systems
    pub fn convert(&self, from: Units, to: Units) -> Self {
        Self {
            x: Units::convert(self.x, from, to),
            y: Units::convert(self.y, from, to),
            z: Units::convert(self.z, from, to),
            a: self.a,
            feed_rate: self.feed_rate.map(|f| Units::convert(f, from, to)),
        }
    }

    /// Euclidean distance over the linear axes
    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Compare linear axes within a tolerance
    pub fn approx_eq(&self, other: &Point3, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Point3,
    /// Maximum corner
    pub max: Point3,
}

impl BoundingBox {
    /// Create a bounding box from its corners
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = Point3::new(first.x, first.y, first.z);
        let mut max = min;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    /// True when every max coordinate is at least its min coordinate
    pub fn is_valid(&self) -> bool {
        self.max.x >= self.min.x && self.max.y >= self.min.y && self.max.z >= self.min.z
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }
}
