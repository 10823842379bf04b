//! Cross-slice notifications
//!
//! Slices never look at each other's actions. After a slice records, the
//! session broadcasts a `SliceEvent` to every observer and each one applies
//! its own rule.

use crate::undo_redo::SliceTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceEvent {
    /// The tagged slice pushed a new entry onto its history
    Recorded(SliceTag),
}

pub trait SliceObserver {
    fn on_event(&mut self, event: &SliceEvent);
}

/// Deliver `event` to every observer in order
pub fn broadcast(event: SliceEvent, observers: &mut [&mut dyn SliceObserver]) {
    for observer in observers.iter_mut() {
        observer.on_event(&event);
    }
}
