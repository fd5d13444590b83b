//! # CamKit
//!
//! A Rust toolkit for CNC toolpaths:
//! - G-code and binary machine-file ingestion
//! - Adaptive clearing toolpath generation
//! - Post-processing for Fanuc, Haas and GRBL controllers
//! - Tick-driven playback with undo/redo of toolpath edits
//!
//! ## Architecture
//!
//! CamKit is organized as a workspace with multiple crates:
//!
//! 1. **camkit-core** - Toolpath data model, units, error taxonomy
//! 2. **camkit-parser** - G-code parser and binary file reader
//! 3. **camkit-camtools** - Toolpath generators
//! 4. **camkit-post** - Controller dialects and program generation
//! 5. **camkit-playback** - Playback engine and undo history
//! 6. **camkit-settings** - Configuration files
//! 7. **camkit** - This crate: logging setup, file loading and the CLI

pub mod loader;

pub use camkit_core::{
    BinaryEntity, BoundingBox, CamToolError, Error, FileFormatError, GeneratedToolpath,
    MachineSetup, Material, Operation, Point3, PostError, Result, Tool, Toolpath, ToolpathSet,
    Units,
};
pub use camkit_camtools::AdaptiveClearingGenerator;
pub use camkit_parser::{BinaryToolpathReader, GcodeParser, ParserConfig};
pub use camkit_playback::{PlaybackEngine, UndoHistory};
pub use camkit_post::{DialectKind, ProgramGenerator};
pub use camkit_settings::Config;
pub use loader::{load_bytes, load_file, LoadedFile, SourceKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::WARN.to_string()));

    // stdout carries program text, so logs go to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
