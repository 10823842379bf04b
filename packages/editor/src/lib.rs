//! # Experience Builder Editor
//!
//! Editing state for a page: the layout/model tree, page-level form data,
//! and one undo/redo timeline across both.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ xb-layout: tree + model, path operations    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Layout model store (LayoutMutation)      │
//! │  - Page data store (PageDataAction)         │
//! │  - History per slice + future eraser        │
//! │  - Undo/redo coordinator over slice tags    │
//! │  - Copy/paste, palette and drag insertion   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PreviewService: render markup, patch models │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are immutable**: every edit produces a new state; earlier
//!    states share unchanged subtrees and are never written to
//! 2. **Bad input is a no-op**: unknown uuids and malformed paths are logged
//!    and ignored; only broken structural assumptions become errors
//! 3. **The coordinator owns order**: `can_undo`/`can_redo` come from its
//!    stacks, never from a single slice
//!
//! ## Usage
//!
//! ```rust,ignore
//! use xb_editor::{Action, EditSession, EditorConfig, LayoutMutation};
//!
//! let mut session = EditSession::new("page-1", &EditorConfig::default());
//! session.hydrate(root, page_data)?;
//!
//! let result = session.dispatch(Action::Layout(LayoutMutation::DuplicateNode {
//!     uuid: "hero".to_string(),
//! }))?;
//! let select = result.selected();
//!
//! session.dispatch(Action::Undo)?;
//! ```

mod clipboard;
mod config;
mod errors;
mod events;
mod history;
mod insertion;
mod layout_model;
mod mutations;
mod page_data;
mod pipeline;
mod session;
mod undo_redo;

pub use clipboard::{copy, copy_piece, paste, paste_path, Clipboard, MemoryClipboard};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use events::{broadcast, SliceEvent, SliceObserver};
pub use history::{History, Recorded, DEFAULT_HISTORY_LIMIT};
pub use insertion::{
    add_new_component_to_layout, add_new_section_to_layout, drop_target_path, insert_from_drag,
    move_from_drag, ComponentCatalog, ComponentDefinition, MemoryCatalog,
};
pub use layout_model::{Direction, EditResult, LayoutEdit, LayoutModelState};
pub use mutations::{LayoutMutation, MutationOutcome};
pub use page_data::{PageData, PageDataAction};
pub use pipeline::{NullPreview, PreviewError, PreviewPipeline, PreviewRequest, PreviewService};
pub use session::{Action, DispatchResult, EditSession};
pub use undo_redo::{HistoryIntent, SliceTag, UndoRedoCoordinator};

// Re-export layout types for convenience
pub use xb_layout::{
    ComponentModel, ComponentModels, ComponentNode, IdGenerator, LayoutModelPiece, RegionNode,
    RootLayoutModel,
};
