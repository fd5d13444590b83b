//! Input file loading
//!
//! Detects whether a file is a binary machine file or G-code text and
//! decodes it into a toolpath set. Binary geometry entities are sampled
//! into one toolpath each.

use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use camkit_core::{BinaryEntity, Toolpath, ToolpathSet, Units};
use camkit_parser::{
    BinaryContents, BinaryToolpathReader, GcodeParser, ParserConfig, GEOMETRY_MAGIC,
    TOOLPATH_MAGIC,
};

/// Where a loaded set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Gcode,
    BinaryGeometry,
    BinaryToolpaths,
}

/// Result of loading one input file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub kind: SourceKind,
    pub units: Units,
    pub toolpaths: ToolpathSet,
    /// Raw entities of a geometry file
    pub entities: Vec<BinaryEntity>,
    /// Malformed G-code words or unknown binary records that were skipped
    pub skipped: usize,
}

/// Read and decode a file
pub fn load_file(path: &Path, config: &ParserConfig) -> anyhow::Result<LoadedFile> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let loaded = load_bytes(&data, config)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    info!(
        "Loaded {} toolpaths from {}",
        loaded.toolpaths.len(),
        path.display()
    );
    Ok(loaded)
}

/// Decode file contents, choosing the decoder from the leading signature
pub fn load_bytes(data: &[u8], config: &ParserConfig) -> anyhow::Result<LoadedFile> {
    let signature = data.get(..4);
    if signature == Some(GEOMETRY_MAGIC.as_slice()) || signature == Some(TOOLPATH_MAGIC.as_slice())
    {
        return load_binary(data, config);
    }

    let text = std::str::from_utf8(data).context("Input is neither a binary file nor text")?;
    let program = GcodeParser::with_config(config.clone()).parse(text);
    for warning in &program.warnings {
        warn!("Line {}: ignored malformed word {}", warning.line, warning.word);
    }

    Ok(LoadedFile {
        kind: SourceKind::Gcode,
        units: program.units,
        skipped: program.warnings.len(),
        toolpaths: ToolpathSet::from(program.toolpaths),
        entities: Vec::new(),
    })
}

fn load_binary(data: &[u8], config: &ParserConfig) -> anyhow::Result<LoadedFile> {
    match BinaryToolpathReader::new().read(data)? {
        BinaryContents::Geometry(file) => {
            let toolpaths = file
                .entities
                .iter()
                .map(|entity| {
                    Toolpath::with_points(config.initial_tool, file.units, entity.to_points())
                })
                .filter(|t| !t.is_empty())
                .collect();
            Ok(LoadedFile {
                kind: SourceKind::BinaryGeometry,
                units: file.units,
                toolpaths,
                entities: file.entities,
                skipped: file.skipped_records,
            })
        }
        BinaryContents::Toolpaths(file) => Ok(LoadedFile {
            kind: SourceKind::BinaryToolpaths,
            units: file.units,
            toolpaths: ToolpathSet::from(file.toolpaths),
            entities: Vec::new(),
            skipped: 0,
        }),
    }
}
