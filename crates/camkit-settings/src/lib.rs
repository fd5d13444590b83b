//! CamKit Settings Crate
//!
//! Handles application configuration and its persistence as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{Config, GeneratorSettings, PostSettings};
pub use error::{Result, SettingsError};
