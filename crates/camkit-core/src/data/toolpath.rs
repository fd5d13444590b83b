//! Toolpath model
//!
//! A [`Toolpath`] is one continuous tool engagement: an ordered list of
//! tool-tip positions cut with a single tool in a single unit system.
//! A [`ToolpathSet`] is the ordered collection that playback walks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

use super::{BoundingBox, Point3};
use crate::units::Units;

/// Unique identifier for a toolpath
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolpathId(pub String);

impl ToolpathId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ToolpathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ToolpathId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One continuous tool engagement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    pub id: ToolpathId,
    /// Controller tool number (`T<n>`)
    pub tool_number: u32,
    pub units: Units,
    pub points: Vec<Point3>,
}

impl Toolpath {
    /// Create an empty toolpath with a generated id
    pub fn new(tool_number: u32, units: Units) -> Self {
        Self::with_points(tool_number, units, Vec::new())
    }

    /// Create a toolpath from points with a generated id
    pub fn with_points(tool_number: u32, units: Units, points: Vec<Point3>) -> Self {
        Self {
            id: ToolpathId::generate(),
            tool_number,
            units,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_point(&self) -> Option<&Point3> {
        self.points.first()
    }

    pub fn last_point(&self) -> Option<&Point3> {
        self.points.last()
    }

    /// Bounding box of all points
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    /// Total travelled distance through the points
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// A new toolpath (fresh id) with the same tool and points converted to `units`
    pub fn converted_to(&self, units: Units) -> Self {
        Self::with_points(
            self.tool_number,
            units,
            self.points
                .iter()
                .map(|p| p.convert(self.units, units))
                .collect(),
        )
    }
}

/// Ordered toolpath collection; insertion order is playback order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolpathSet(Vec<Toolpath>);

impl ToolpathSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Total number of points across all toolpaths
    pub fn point_count(&self) -> usize {
        self.0.iter().map(Toolpath::len).sum()
    }

    /// Bounding box over every toolpath
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.0.iter().flat_map(|t| t.points.iter()))
    }

    pub fn into_inner(self) -> Vec<Toolpath> {
        self.0
    }
}

impl From<Vec<Toolpath>> for ToolpathSet {
    fn from(toolpaths: Vec<Toolpath>) -> Self {
        Self(toolpaths)
    }
}

impl FromIterator<Toolpath> for ToolpathSet {
    fn from_iter<I: IntoIterator<Item = Toolpath>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ToolpathSet {
    type Item = Toolpath;
    type IntoIter = std::vec::IntoIter<Toolpath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ToolpathSet {
    type Item = &'a Toolpath;
    type IntoIter = std::slice::Iter<'a, Toolpath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Deref for ToolpathSet {
    type Target = Vec<Toolpath>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ToolpathSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
