//! Machining operations attached to toolpaths

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use super::toolpath::{Toolpath, ToolpathId};

/// Kind of machining operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Cut,
    Rough,
    Contour,
    Pocket,
    Drill,
    Custom(String),
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cut => write!(f, "Cut"),
            Self::Rough => write!(f, "Rough"),
            Self::Contour => write!(f, "Contour"),
            Self::Pocket => write!(f, "Pocket"),
            Self::Drill => write!(f, "Drill"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Spindle rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpindleDirection {
    /// `M3`
    #[default]
    Clockwise,
    /// `M4`
    CounterClockwise,
}

/// Coolant delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolantKind {
    /// `M8`
    Flood,
    /// `M7`
    Mist,
}

/// Machining parameters for (part of) a toolpath
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub name: String,
    pub kind: OperationKind,
    /// Toolpath these parameters apply to
    pub toolpath_id: ToolpathId,
    /// Points of the toolpath this operation covers; `None` means all of them
    #[serde(default)]
    pub span: Option<Range<usize>>,
    #[serde(default)]
    pub feedrate: Option<f64>,
    #[serde(default)]
    pub spindle_speed: Option<f64>,
    #[serde(default)]
    pub spindle_direction: SpindleDirection,
    #[serde(default)]
    pub coolant: Option<CoolantKind>,
}

impl Operation {
    /// Create an operation covering a whole toolpath
    pub fn new(kind: OperationKind, toolpath_id: ToolpathId) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: kind.to_string(),
            kind,
            toolpath_id,
            span: None,
            feedrate: None,
            spindle_speed: None,
            spindle_direction: SpindleDirection::Clockwise,
            coolant: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_feedrate(mut self, feedrate: f64) -> Self {
        self.feedrate = Some(feedrate);
        self
    }

    pub fn with_spindle(mut self, speed: f64, direction: SpindleDirection) -> Self {
        self.spindle_speed = Some(speed);
        self.spindle_direction = direction;
        self
    }

    pub fn with_coolant(mut self, coolant: CoolantKind) -> Self {
        self.coolant = Some(coolant);
        self
    }
}

/// Output of a toolpath generator: one toolpath plus the operations
/// partitioning its points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedToolpath {
    pub toolpath: Toolpath,
    pub operations: Vec<Operation>,
}

impl GeneratedToolpath {
    /// Points selected by each operation, in operation order
    pub fn operation_points(&self) -> impl Iterator<Item = &[super::Point3]> + '_ {
        self.operations.iter().filter_map(move |op| match &op.span {
            Some(span) => self.toolpath.points.get(span.clone()),
            None => Some(self.toolpath.points.as_slice()),
        })
    }
}
