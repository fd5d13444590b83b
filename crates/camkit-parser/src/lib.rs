//! # CamKit Parser
//!
//! Ingests machine-motion descriptions into the shared toolpath model:
//! - [`GcodeParser`] for G-code program text
//! - [`BinaryToolpathReader`] for binary machine files

pub mod binary;
pub mod gcode;

pub use binary::{
    BinaryContents, BinaryToolpathReader, FileHeader, GeometryFile, RecordTag, ToolpathFile,
    GEOMETRY_MAGIC, HEADER_LEN, TOOLPATH_MAGIC, UNKNOWN_TAG_STRIDE,
};
pub use gcode::{GcodeParser, GcodeState, ParseWarning, ParsedProgram, ParserConfig};
