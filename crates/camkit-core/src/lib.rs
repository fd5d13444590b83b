//! # CamKit Core
//!
//! Core types and utilities for CamKit.
//! Provides the toolpath data model shared by the parsers, generators,
//! post-processors and the playback engine, plus the error taxonomy.

pub mod data;
pub mod error;
pub mod units;

pub use data::{
    ArcEntity, BinaryEntity, BoundingBox, CoolantKind, GeneratedToolpath, MachineSetup, Material,
    Operation, OperationKind, Point3, SpindleDirection, Tool, Toolpath, ToolpathId, ToolpathSet,
    WorkOffset,
};

pub use error::{CamToolError, Error, FileFormatError, PostError, Result};

pub use units::Units;
