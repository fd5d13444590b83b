//! # CamKit CAM Tools
//!
//! Toolpath generators that turn stock geometry, a tool and a material into
//! machining motion.
//!
//! ## Generators Included
//!
//! - **Adaptive Clearing**: layered zigzag clearing of a bounding volume

pub mod adaptive_clearing;

pub use adaptive_clearing::{
    AdaptiveClearingGenerator, ClearingParameters, ADAPTIVE_STEPOVER_RATIO,
};
