//! # Undo/Redo Coordinator
//!
//! One timeline across every independently historied slice. The stacks hold
//! slice tags, not snapshots: each entry says which slice's history to step
//! next. Popping from one stack always pushes onto the other, so an entry is
//! never duplicated and never lost (except when a slice's history limit
//! forgets its oldest state, see `forget_oldest`).
//!
//! ```text
//!   record(t)      undo: [.., t] ──pop──▶ push_front ──▶ [t, ..] :redo
//!   clears redo    redo: [.., t] ◀──push── pop_front ◀── [t, ..]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use xb_layout::IdGenerator;

/// Names one independently historied slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliceTag {
    LayoutModel,
    PageData,
}

/// What a slice's history should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryIntent {
    Undo(SliceTag),
    Redo(SliceTag),
    Record(SliceTag),
}

impl HistoryIntent {
    pub fn tag(&self) -> SliceTag {
        match *self {
            Self::Undo(tag) | Self::Redo(tag) | Self::Record(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UndoRedoCoordinator {
    /// Most recent last
    undo_stack: Vec<SliceTag>,
    /// Next to redo first
    redo_stack: VecDeque<SliceTag>,
    latest_action_id: Option<String>,
}

impl UndoRedoCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slice recorded an undoable action
    pub fn record(&mut self, tag: SliceTag) -> HistoryIntent {
        self.undo_stack.push(tag);
        self.redo_stack.clear();
        HistoryIntent::Record(tag)
    }

    /// Move the newest undo entry to the front of the redo stack
    pub fn request_undo(&mut self, ids: &mut IdGenerator) -> Option<HistoryIntent> {
        let tag = self.undo_stack.pop()?;
        self.redo_stack.push_front(tag);
        self.latest_action_id = Some(ids.new_id());
        debug!(slice = ?tag, action_id = ?self.latest_action_id, "Undo");
        Some(HistoryIntent::Undo(tag))
    }

    /// Move the front redo entry back onto the undo stack
    pub fn request_redo(&mut self, ids: &mut IdGenerator) -> Option<HistoryIntent> {
        let tag = self.redo_stack.pop_front()?;
        self.undo_stack.push(tag);
        self.latest_action_id = Some(ids.new_id());
        debug!(slice = ?tag, action_id = ?self.latest_action_id, "Redo");
        Some(HistoryIntent::Redo(tag))
    }

    /// Drop the oldest undo entry for `tag`. Called when that slice's history
    /// evicted its oldest state, so the two stay the same length.
    pub fn forget_oldest(&mut self, tag: SliceTag) -> bool {
        match self.undo_stack.iter().position(|entry| *entry == tag) {
            Some(index) => {
                self.undo_stack.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Oldest first
    pub fn undo_stack(&self) -> &[SliceTag] {
        &self.undo_stack
    }

    /// Next to redo first
    pub fn redo_stack(&self) -> Vec<SliceTag> {
        self.redo_stack.iter().copied().collect()
    }

    /// Correlation id of the most recent undo or redo
    pub fn latest_action_id(&self) -> Option<&str> {
        self.latest_action_id.as_deref()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
