//! # History Wrapper
//!
//! Past/present/future buffer around one slice of editor state.
//!
//! ## Design
//!
//! - `record` pushes the current present onto `past` and clears `future`
//! - `replace` swaps the present without touching either buffer (filtered
//!   changes and hydration)
//! - `undo`/`redo` step the present one entry back or forward
//! - When another slice records, this slice's `future` is discarded: those
//!   states belong to a branch the other slice's change has made unreachable
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(SliceTag::PageData, PageData::new());
//!
//! history.record(next);
//! history.undo();
//! history.redo();
//! ```

use tracing::debug;

use crate::events::{SliceEvent, SliceObserver};
use crate::undo_redo::SliceTag;

/// Default number of past entries kept per slice
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Result of `History::record`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    /// The limit pushed the oldest past entry out
    pub evicted: bool,
}

#[derive(Debug, Clone)]
pub struct History<S> {
    tag: SliceTag,

    /// Earlier states (oldest first)
    past: Vec<S>,

    present: S,

    /// Undone states (most recently undone last)
    future: Vec<S>,

    /// Maximum number of past entries (0 = unlimited)
    limit: usize,
}

impl<S: Clone> History<S> {
    pub fn new(tag: SliceTag, present: S) -> Self {
        Self::with_limit(tag, present, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(tag: SliceTag, present: S, limit: usize) -> Self {
        Self {
            tag,
            past: Vec::new(),
            present,
            future: Vec::new(),
            limit,
        }
    }

    pub fn tag(&self) -> SliceTag {
        self.tag
    }

    pub fn present(&self) -> &S {
        &self.present
    }

    pub fn past(&self) -> &[S] {
        &self.past
    }

    pub fn future(&self) -> &[S] {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Make `next` the present and remember the old one
    pub fn record(&mut self, next: S) -> Recorded {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);
        self.future.clear();

        let evicted = self.limit > 0 && self.past.len() > self.limit;
        if evicted {
            self.past.remove(0);
            debug!(slice = ?self.tag, limit = self.limit, "History limit reached, dropped oldest entry");
        }

        Recorded { evicted }
    }

    /// Make `next` the present without recording anything
    pub fn replace(&mut self, next: S) {
        self.present = next;
    }

    /// Step back one entry
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        true
    }

    /// Step forward one entry
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    /// Drop every entry and start over from `present`
    pub fn reset(&mut self, present: S) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }
}

impl<S: Clone> SliceObserver for History<S> {
    fn on_event(&mut self, event: &SliceEvent) {
        let SliceEvent::Recorded(tag) = *event;
        if tag != self.tag && !self.future.is_empty() {
            debug!(
                slice = ?self.tag,
                recorded_by = ?tag,
                discarded = self.future.len(),
                "Erasing stale redo states"
            );
            self.future.clear();
        }
    }
}
