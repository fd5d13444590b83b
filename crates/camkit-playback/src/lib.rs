//! # CamKit Playback
//!
//! Deterministic playback of a toolpath set, driven one tick at a time by an
//! external frame callback, plus a bounded undo/redo history of set edits.

pub mod engine;
pub mod history;

pub use engine::{
    Cursor, Direction, PlaybackConfig, PlaybackEngine, PlaybackFrame, PlaybackState, TickOutcome,
    TickToken, FAST_STEP,
};
pub use history::{UndoHistory, UndoSnapshot, DEFAULT_HISTORY_CAPACITY};
