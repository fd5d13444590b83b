//! Error handling for CamKit
//!
//! Provides error types for every layer of the toolpath pipeline:
//! - File format errors (binary toolpath decoding)
//! - CAM tool errors (toolpath generation)
//! - Post-processor errors (program encoding)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Binary file format error type
///
/// Raised by the binary toolpath reader. Both variants abort the read;
/// no partial result is ever returned alongside them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileFormatError {
    /// The file does not start with a recognised magic signature
    #[error("Invalid signature: expected one of {expected}, found {found:?}")]
    InvalidSignature {
        /// The accepted signatures.
        expected: String,
        /// The bytes found at the start of the file.
        found: String,
    },

    /// A header, record or run extends past the end of the buffer
    #[error("Truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedData {
        /// Byte offset where the incomplete structure starts.
        offset: usize,
        /// Number of bytes the structure requires.
        needed: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },
}

/// CAM tool error type
///
/// Represents errors related to toolpath generation parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CamToolError {
    /// A required input was never supplied
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A supplied input cannot produce a toolpath
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

/// Post-processor error type
///
/// Represents errors raised while encoding toolpaths into a program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostError {
    /// Nothing to encode
    #[error("Toolpath collection is empty or has no points")]
    EmptyToolpath,

    /// An operation selects points the toolpath does not have
    #[error("Operation {operation} selects points {start}..{end} but toolpath {toolpath} has {len}")]
    SpanOutOfRange {
        /// The operation name.
        operation: String,
        /// The toolpath identifier.
        toolpath: String,
        /// Span start (inclusive).
        start: usize,
        /// Span end (exclusive).
        end: usize,
        /// Number of points in the toolpath.
        len: usize,
    },

    /// A coordinate too large to write as a single program block
    #[error("Coordinate {value} in toolpath {toolpath} exceeds the program limit")]
    CoordinateOutOfRange {
        /// The toolpath identifier.
        toolpath: String,
        /// The offending value, in program units.
        value: f64,
    },
}

/// Main error type for CamKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Binary file format error
    #[error(transparent)]
    FileFormat(#[from] FileFormatError),

    /// Toolpath generation error
    #[error(transparent)]
    CamTool(#[from] CamToolError),

    /// Program encoding error
    #[error(transparent)]
    Post(#[from] PostError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a binary format error
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::FileFormat(_))
    }

    /// Check if this is a generation error
    pub fn is_generation_error(&self) -> bool {
        matches!(self, Error::CamTool(_))
    }

    /// Check if this is a post-processor error
    pub fn is_post_error(&self) -> bool {
        matches!(self, Error::Post(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
