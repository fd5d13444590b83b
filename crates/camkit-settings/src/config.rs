//! Configuration and settings management for CamKit
//!
//! Configuration is organized into one section per component:
//! - Parser options (M30 handling, initial tool, machine motion codes)
//! - Playback tuning (speed, history capacity)
//! - Post-processor defaults (dialect, safety height, program header)
//! - Generator defaults (units)
//!
//! Files are read and written as JSON or TOML, chosen by extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use camkit_core::{MachineSetup, Units, WorkOffset};
use camkit_parser::ParserConfig;
use camkit_playback::PlaybackConfig;
use camkit_post::DialectKind;

use crate::error::{Result, SettingsError};

const APP_DIR: &str = "camkit";
const CONFIG_FILE: &str = "config.toml";

/// Post-processor defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostSettings {
    /// Controller dialect
    pub dialect: DialectKind,
    /// Clearance above each toolpath, in `units` (or the dialect default)
    pub safety_height: f64,
    /// Program name written into the header comment
    pub program_name: String,
    /// Program number for `O` headers
    pub program_number: u32,
    /// Work coordinate system
    pub work_offset: WorkOffset,
    /// Program units; unset selects the dialect default
    pub units: Option<Units>,
}

impl Default for PostSettings {
    fn default() -> Self {
        let setup = MachineSetup::default();
        Self {
            dialect: DialectKind::default(),
            safety_height: setup.safety_height,
            program_name: setup.program_name,
            program_number: setup.program_number,
            work_offset: setup.work_offset,
            units: setup.units,
        }
    }
}

impl PostSettings {
    /// Machine setup for the program generator
    pub fn to_setup(&self) -> MachineSetup {
        MachineSetup {
            units: self.units,
            work_offset: self.work_offset,
            safety_height: self.safety_height,
            program_name: self.program_name.clone(),
            program_number: self.program_number,
        }
    }
}

/// Toolpath generator defaults
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Units of stock bounds and tool dimensions
    pub units: Units,
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// G-code parser options
    pub parser: ParserConfig,
    /// Playback engine tuning
    pub playback: PlaybackConfig,
    /// Post-processor defaults
    pub post: PostSettings,
    /// Generator defaults
    pub generator: GeneratorSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config dir>/camkit/config.toml`)
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load the platform config file, or defaults when it does not exist
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.playback.speed.is_finite() && self.playback.speed > 0.0) {
            return Err(SettingsError::invalid("playback.speed", "must be > 0"));
        }

        if !(self.post.safety_height.is_finite() && self.post.safety_height >= 0.0) {
            return Err(SettingsError::invalid(
                "post.safety_height",
                "must be >= 0",
            ));
        }

        if self.post.program_name.trim().is_empty() {
            return Err(SettingsError::invalid(
                "post.program_name",
                "must not be empty",
            ));
        }

        if !(1..=99999).contains(&self.post.program_number) {
            return Err(SettingsError::invalid(
                "post.program_number",
                "must be between 1 and 99999",
            ));
        }

        Ok(())
    }
}

/// File formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            _ => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}
