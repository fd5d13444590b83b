//! Geometry entities decoded from binary machine files
//!
//! These are raw CAD primitives, distinct from [`super::Toolpath`]; the
//! geometry collaborator decides how to turn them into motion.

use serde::{Deserialize, Serialize};

use super::Point3;

/// Default number of chords used when sampling an arc
pub const DEFAULT_ARC_SEGMENTS: usize = 32;

/// Circular arc in the plane defined by `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcEntity {
    pub center: Point3,
    pub radius: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
    pub normal: Point3,
}

impl ArcEntity {
    /// Sample `segments + 1` points from start to end angle
    ///
    /// Points are computed in the XY plane at the center's Z.
    pub fn sample_points(&self, segments: usize) -> Vec<Point3> {
        let segments = segments.max(1);
        let sweep = self.end_angle - self.start_angle;
        (0..=segments)
            .map(|i| {
                let angle = self.start_angle + sweep * (i as f64 / segments as f64);
                Point3::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                    self.center.z,
                )
            })
            .collect()
    }
}

/// A decoded geometry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BinaryEntity {
    Line { start: Point3, end: Point3 },
    Arc(ArcEntity),
    Point { position: Point3 },
}

impl BinaryEntity {
    /// Points approximating this entity
    pub fn to_points(&self) -> Vec<Point3> {
        match self {
            BinaryEntity::Line { start, end } => vec![*start, *end],
            BinaryEntity::Arc(arc) => arc.sample_points(DEFAULT_ARC_SEGMENTS),
            BinaryEntity::Point { position } => vec![*position],
        }
    }
}
