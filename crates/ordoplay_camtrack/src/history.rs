// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history for curve and offset edits.
//!
//! Each entry holds a full copy of the curve and offsets taken before the
//! edit it reverts.

use crate::curve::KeyframeCurve;
use crate::offset::OffsetStack;
use std::collections::VecDeque;
use thiserror::Error;

/// Default maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Copy of the editable data at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Easing curve
    pub curve: KeyframeCurve,
    /// Offset layers
    pub offsets: OffsetStack,
}

/// Identifies consecutive edits that collapse into one undo step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeKey {
    /// Editing one axis of one offset layer
    OffsetComponent(usize, crate::offset::Axis),
    /// Editing the time/value of one keyframe
    Keyframe(crate::keyframe::KeyframeId),
}

#[derive(Debug, Clone)]
struct Entry {
    description: String,
    before: Snapshot,
    merge_key: Option<MergeKey>,
}

/// Bounded undo/redo stacks
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: VecDeque<Entry>,
    redo_stack: Vec<(String, Snapshot)>,
    max_depth: usize,
    /// Whether the newest entry may absorb the next matching edit
    merge_open: bool,
}

impl EditHistory {
    /// Create a history keeping at most `max_depth` undo steps
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            merge_open: false,
        }
    }

    /// Record an edit that has just been applied.
    ///
    /// `before` is the state prior to the edit. If the previous entry has the
    /// same merge key and merging has not been sealed, the edit folds into it.
    pub fn record(&mut self, description: impl Into<String>, before: Snapshot, merge_key: Option<MergeKey>) {
        self.redo_stack.clear();

        let merges = self.merge_open
            && merge_key.is_some()
            && self.undo_stack.back().is_some_and(|e| e.merge_key == merge_key);
        self.merge_open = merge_key.is_some();
        if merges {
            return;
        }

        self.undo_stack.push_back(Entry {
            description: description.into(),
            before,
            merge_key,
        });
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Stop the newest entry from absorbing further edits
    pub fn seal(&mut self) {
        self.merge_open = false;
    }

    /// Step back; `current` becomes the redo target. Returns the state to restore.
    pub fn undo(&mut self, current: Snapshot) -> Result<Snapshot> {
        let entry = self.undo_stack.pop_back().ok_or(HistoryError::NothingToUndo)?;
        tracing::debug!("Undo: {}", entry.description);
        self.redo_stack.push((entry.description, current));
        self.merge_open = false;
        Ok(entry.before)
    }

    /// Step forward again. Returns the state to restore.
    pub fn redo(&mut self, current: Snapshot) -> Result<Snapshot> {
        let (description, after) = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        tracing::debug!("Redo: {}", description);
        self.undo_stack.push_back(Entry {
            description,
            before: current,
            merge_key: None,
        });
        self.merge_open = false;
        Ok(after)
    }

    /// Whether there is anything to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is anything to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.description.as_str())
    }

    /// Description of the step `redo` would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|(d, _)| d.as_str())
    }

    /// Number of undo steps
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.merge_open = false;
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}
