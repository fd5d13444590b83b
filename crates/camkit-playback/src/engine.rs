//! Toolpath playback engine
//!
//! [`PlaybackEngine`] owns the active [`ToolpathSet`] and a cursor into it.
//! Playback advances only when the caller delivers a tick carrying the
//! [`TickToken`] handed out by [`PlaybackEngine::play`]; every stop, pause or
//! restart invalidates the outstanding token, so a late tick from a previous
//! session is ignored.
//!
//! Every set mutation (`load`, `append`, `replace`, `clear`, `undo`, `redo`)
//! stops playback first and resets the cursor to the start.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use camkit_core::{Point3, Toolpath, ToolpathSet};

use crate::history::{UndoHistory, UndoSnapshot, DEFAULT_HISTORY_CAPACITY};

/// Toolpaths skipped by fast forward and fast rewind
pub const FAST_STEP: usize = 5;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    PlayingForward,
    PlayingReverse,
    Paused,
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::PlayingForward => "Playing forward",
            PlaybackState::PlayingReverse => "Playing reverse",
            PlaybackState::Paused => "Paused",
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            PlaybackState::PlayingForward | PlaybackState::PlayingReverse
        )
    }
}

/// Playback direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    fn state(self) -> PlaybackState {
        match self {
            Direction::Forward => PlaybackState::PlayingForward,
            Direction::Reverse => PlaybackState::PlayingReverse,
        }
    }
}

/// Position within the active set
///
/// `point` is fractional so speeds below one point per tick still advance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub path: usize,
    pub point: f64,
}

impl Cursor {
    pub fn new(path: usize, point: f64) -> Self {
        Self { path, point }
    }

    /// Index of the point under the cursor
    pub fn point_index(&self) -> usize {
        self.point.max(0.0).floor() as usize
    }
}

/// Ticket for the tick scheduled by the current play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Tool position emitted by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackFrame {
    pub path: usize,
    pub point: usize,
    pub tool_number: u32,
    pub position: Point3,
}

/// Result of delivering a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A frame was emitted and playback continues
    Frame(PlaybackFrame),
    /// Playback ran past the end of the set and is now idle; carries the
    /// last frame if one was emitted
    Finished(Option<PlaybackFrame>),
    /// The token was stale or playback was not running
    Cancelled,
}

/// Playback tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Points advanced per tick
    pub speed: f64,
    /// Snapshots kept across the undo and redo stacks
    pub history_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Playback over a toolpath set with undo/redo of set edits
#[derive(Debug)]
pub struct PlaybackEngine {
    active: ToolpathSet,
    history: UndoHistory,
    state: PlaybackState,
    direction: Direction,
    cursor: Cursor,
    speed: f64,
    session: u64,
    token: Option<TickToken>,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        let mut engine = Self {
            active: ToolpathSet::new(),
            history: UndoHistory::with_capacity(config.history_capacity),
            state: PlaybackState::Idle,
            direction: Direction::Forward,
            cursor: Cursor::default(),
            speed: 1.0,
            session: 0,
            token: None,
        };
        engine.set_speed(config.speed);
        engine
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn active_set(&self) -> &ToolpathSet {
        &self.active
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Points advanced per tick; non-positive or non-finite values are ignored
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        } else {
            warn!("Ignoring invalid playback speed {}", speed);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Frame for the point under the cursor, if it addresses one
    pub fn current_frame(&self) -> Option<PlaybackFrame> {
        let toolpath = self.active.get(self.cursor.path)?;
        let point = self.cursor.point_index();
        let position = *toolpath.points.get(point)?;
        Some(PlaybackFrame {
            path: self.cursor.path,
            point,
            tool_number: toolpath.tool_number,
            position,
        })
    }

    /// Replace the active set, recording the previous one for undo
    pub fn load(&mut self, set: ToolpathSet) {
        info!(
            "Loading {} toolpaths ({} points) into playback",
            set.len(),
            set.point_count()
        );
        self.mutate(|active| *active = set);
    }

    /// Add a toolpath at the end of the active set
    pub fn append(&mut self, toolpath: Toolpath) {
        self.mutate(|active| active.push(toolpath));
    }

    /// Swap the toolpath at `index`, returning the one it replaced
    ///
    /// Out-of-range indexes leave the set and history untouched.
    pub fn replace(&mut self, index: usize, toolpath: Toolpath) -> Option<Toolpath> {
        if index >= self.active.len() {
            warn!(
                "Cannot replace toolpath {} of {}",
                index,
                self.active.len()
            );
            return None;
        }
        let mut previous = None;
        self.mutate(|active| previous = Some(std::mem::replace(&mut active[index], toolpath)));
        previous
    }

    /// Empty the active set
    pub fn clear(&mut self) {
        self.mutate(|active| active.clear());
    }

    /// Restore the set active before the last mutation
    pub fn undo(&mut self) {
        self.stop();
        let current = UndoSnapshot::new(self.active.clone());
        if let Some(previous) = self.history.undo(current) {
            debug!("Undo: restoring {} toolpaths", previous.set().len());
            self.active = previous.into_set();
            self.cursor = Cursor::default();
        }
    }

    /// Re-apply the last undone mutation
    pub fn redo(&mut self) {
        self.stop();
        let current = UndoSnapshot::new(self.active.clone());
        if let Some(next) = self.history.redo(current) {
            debug!("Redo: restoring {} toolpaths", next.set().len());
            self.active = next.into_set();
            self.cursor = Cursor::default();
        }
    }

    /// Start playing, returning the token the next tick must carry
    ///
    /// A cursor already at the end of playback in `direction` restarts
    /// from that direction's origin.
    pub fn play(&mut self, direction: Direction) -> TickToken {
        self.stop();
        if self.at_end(direction) {
            self.cursor = self.origin(direction);
        }
        self.direction = direction;
        self.state = direction.state();
        self.issue_token()
    }

    /// Continue a paused session in its previous direction
    pub fn resume(&mut self) -> Option<TickToken> {
        if self.state != PlaybackState::Paused {
            return None;
        }
        self.state = self.direction.state();
        Some(self.issue_token())
    }

    /// Suspend playback, keeping the cursor
    pub fn pause(&mut self) {
        if self.state.is_playing() {
            self.state = PlaybackState::Paused;
            self.token = None;
        }
    }

    /// Return to idle, keeping the cursor
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
        self.token = None;
    }

    /// Emit the frame under the cursor and advance by one tick
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if !self.state.is_playing() || self.token != Some(token) {
            return TickOutcome::Cancelled;
        }

        if self.current_frame().is_none() && !self.skip_empty(self.direction) {
            self.finish();
            return TickOutcome::Finished(None);
        }
        let Some(frame) = self.current_frame() else {
            self.finish();
            return TickOutcome::Finished(None);
        };

        if self.advance() {
            TickOutcome::Frame(frame)
        } else {
            self.finish();
            TickOutcome::Finished(Some(frame))
        }
    }

    pub fn step_forward(&mut self) {
        self.jump(1, Direction::Forward);
    }

    pub fn step_backward(&mut self) {
        self.jump(1, Direction::Reverse);
    }

    pub fn fast_forward(&mut self) {
        self.jump(FAST_STEP, Direction::Forward);
    }

    pub fn fast_rewind(&mut self) {
        self.jump(FAST_STEP, Direction::Reverse);
    }

    fn mutate(&mut self, edit: impl FnOnce(&mut ToolpathSet)) {
        self.stop();
        self.history.push(UndoSnapshot::new(self.active.clone()));
        edit(&mut self.active);
        self.cursor = Cursor::default();
    }

    fn issue_token(&mut self) -> TickToken {
        self.session += 1;
        let token = TickToken(self.session);
        self.token = Some(token);
        token
    }

    fn finish(&mut self) {
        debug!("Playback finished at path {}", self.cursor.path);
        self.stop();
    }

    fn last_index(&self, path: usize) -> usize {
        self.active
            .get(path)
            .map(|t| t.len().saturating_sub(1))
            .unwrap_or(0)
    }

    fn origin(&self, direction: Direction) -> Cursor {
        match direction {
            Direction::Forward => Cursor::default(),
            Direction::Reverse => {
                let path = self.active.len().saturating_sub(1);
                Cursor::new(path, self.last_index(path) as f64)
            }
        }
    }

    fn at_end(&self, direction: Direction) -> bool {
        if self.active.is_empty() {
            return false;
        }
        match direction {
            Direction::Forward => {
                let last = self.active.len() - 1;
                self.cursor.path >= last && self.cursor.point_index() >= self.last_index(last)
            }
            Direction::Reverse => self.cursor.path == 0 && self.cursor.point <= 0.0,
        }
    }

    /// Move the cursor onto the next non-empty toolpath in `direction`
    fn skip_empty(&mut self, direction: Direction) -> bool {
        loop {
            if self
                .active
                .get(self.cursor.path)
                .is_some_and(|t| !t.is_empty())
            {
                return true;
            }
            if !self.enter_next(direction) {
                return false;
            }
        }
    }

    /// Step to the neighbouring toolpath, placing the cursor on its entering edge
    fn enter_next(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => {
                if self.cursor.path + 1 >= self.active.len() {
                    return false;
                }
                self.cursor = Cursor::new(self.cursor.path + 1, 0.0);
            }
            Direction::Reverse => {
                if self.cursor.path == 0 {
                    return false;
                }
                let path = self.cursor.path - 1;
                self.cursor = Cursor::new(path, self.last_index(path) as f64);
            }
        }
        true
    }

    /// Advance one tick; false once playback leaves the set
    fn advance(&mut self) -> bool {
        match self.direction {
            Direction::Forward => {
                let len = self.active.get(self.cursor.path).map_or(0, Toolpath::len);
                let next = self.cursor.point + self.speed;
                if (next.floor() as usize) < len {
                    self.cursor.point = next;
                    return true;
                }
                if self.enter_next(Direction::Forward) && self.skip_empty(Direction::Forward) {
                    return true;
                }
                self.cursor.point = len.saturating_sub(1) as f64;
                false
            }
            Direction::Reverse => {
                let next = self.cursor.point - self.speed;
                if next >= 0.0 {
                    self.cursor.point = next;
                    return true;
                }
                if self.enter_next(Direction::Reverse) && self.skip_empty(Direction::Reverse) {
                    return true;
                }
                self.cursor.point = 0.0;
                false
            }
        }
    }

    fn jump(&mut self, count: usize, direction: Direction) {
        let last = self.active.len().saturating_sub(1);
        let path = match direction {
            Direction::Forward => self.cursor.path.saturating_add(count).min(last),
            Direction::Reverse => self.cursor.path.saturating_sub(count),
        };
        debug!("Jump to toolpath {}", path);
        self.cursor = Cursor::new(path, 0.0);
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}
