//! # CamKit Post-Processors
//!
//! Encodes toolpaths into controller programs.
//!
//! - [`Dialect`]: controller capabilities and block formatting
//! - [`FanucDialect`], [`HaasDialect`], [`GrblDialect`]: supported controllers
//! - [`ProgramGenerator`]: composes header, toolpaths and footer
//! - [`LineSanitizer`]: final line clean-up

pub mod dialect;
pub mod fanuc;
pub mod generator;
pub mod grbl;
pub mod haas;
pub mod sanitizer;

pub use dialect::{comment, format_number, Dialect, DialectKind};
pub use fanuc::{FanucDialect, FANUC_RETRACT_INTERVAL};
pub use generator::ProgramGenerator;
pub use grbl::GrblDialect;
pub use haas::HaasDialect;
pub use sanitizer::{
    EmptyLineRemover, LineProcessor, LineSanitizer, LineWrapper, MotionWordCollapser,
    SanitizerConfig, SanitizerState, DEFAULT_MAX_LINE_LENGTH,
};
