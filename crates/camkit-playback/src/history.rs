//! Undo/redo history of toolpath sets

use std::collections::VecDeque;

use camkit_core::ToolpathSet;

/// Entries kept across both stacks unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Deep copy of a toolpath set taken before a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct UndoSnapshot {
    set: ToolpathSet,
}

impl UndoSnapshot {
    pub fn new(set: ToolpathSet) -> Self {
        Self { set }
    }

    pub fn set(&self) -> &ToolpathSet {
        &self.set
    }

    pub fn into_set(self) -> ToolpathSet {
        self.set
    }
}

/// Bounded undo and redo stacks
///
/// The two stacks together never hold more than `capacity` snapshots.
/// Pushing evicts the oldest undo entries first and always clears redo.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo_stack: VecDeque<UndoSnapshot>,
    redo_stack: VecDeque<UndoSnapshot>,
    capacity: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record the state that a mutation is about to replace
    pub fn push(&mut self, snapshot: UndoSnapshot) {
        self.redo_stack.clear();
        if self.capacity == 0 {
            return;
        }

        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Step back: returns the state to restore and keeps `current` for redo
    pub fn undo(&mut self, current: UndoSnapshot) -> Option<UndoSnapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Some(previous)
    }

    /// Step forward: returns the state to restore and keeps `current` for undo
    pub fn redo(&mut self, current: UndoSnapshot) -> Option<UndoSnapshot> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}
