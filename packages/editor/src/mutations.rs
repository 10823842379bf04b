//! # Layout Mutations
//!
//! Serializable operations on the layout slice.
//!
//! ## Mutation Semantics
//!
//! ### Structural (recorded)
//! - `deleteNode`: removes the component, its descendants and their model entries
//! - `duplicateNode`: independent copy right after the original
//! - `moveNode`: destination path computed against the tree before the move
//! - `sortNode` / `shiftNode`: reorder within the current parent
//! - `insertNodes`: fragment inserted at a path with fresh uuids
//! - `updateComponent`: replaces one component's prop data
//!
//! ### Bypass (never recorded)
//! - `setLayoutModel`: wholesale hydration from the backend
//! - `setUpdatePreview`: toggles the render-owed flag

use serde::{Deserialize, Serialize};
use tracing::debug;
use xb_layout::{ComponentModel, ComponentModels, IdGenerator, LayoutModelPiece, RegionNode};

use crate::layout_model::{Direction, LayoutEdit, LayoutModelState};
use crate::EditorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LayoutMutation {
    DeleteNode {
        uuid: String,
    },

    DuplicateNode {
        uuid: String,
    },

    MoveNode {
        uuid: String,
        to: Vec<usize>,
    },

    /// `to` is the index among the node's siblings
    SortNode {
        uuid: String,
        to: usize,
    },

    ShiftNode {
        uuid: String,
        direction: Direction,
    },

    InsertNodes {
        to: Vec<usize>,
        piece: LayoutModelPiece,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        forced_uuid: Option<String>,
    },

    UpdateComponent {
        uuid: String,
        model: ComponentModel,
    },

    SetLayoutModel {
        layout: Vec<RegionNode>,
        #[serde(default)]
        model: ComponentModels,
        #[serde(default)]
        initialized: bool,
    },

    SetUpdatePreview {
        initialized: bool,
    },
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Changed {
        state: LayoutModelState,
        /// Uuids of inserted top-level nodes, in destination order
        inserted: Vec<String>,
    },
    /// Invalid input or nothing to do. Already logged.
    Unchanged,
}

impl From<Option<LayoutEdit>> for MutationOutcome {
    fn from(edit: Option<LayoutEdit>) -> Self {
        match edit {
            Some(LayoutEdit { state, inserted }) => Self::Changed { state, inserted },
            None => Self::Unchanged,
        }
    }
}

impl MutationOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

impl LayoutMutation {
    /// Apply against `state`, drawing fresh uuids from `ids`
    pub fn apply(
        &self,
        state: &LayoutModelState,
        ids: &mut IdGenerator,
    ) -> Result<MutationOutcome, EditorError> {
        debug!(mutation = self.name(), "Applying layout mutation");

        let edit = match self {
            Self::DeleteNode { uuid } => state.delete_node(uuid)?,
            Self::DuplicateNode { uuid } => state.duplicate_node(uuid, ids)?,
            Self::MoveNode { uuid, to } => state.move_node(uuid, to)?,
            Self::SortNode { uuid, to } => state.sort_node(uuid, *to)?,
            Self::ShiftNode { uuid, direction } => state.shift_node(uuid, *direction)?,
            Self::InsertNodes {
                to,
                piece,
                forced_uuid,
            } => state.insert_nodes(to, piece, forced_uuid.as_deref(), ids)?,
            Self::UpdateComponent { uuid, model } => state.update_component(uuid, model)?,
            Self::SetLayoutModel {
                layout,
                model,
                initialized,
            } => {
                return Ok(MutationOutcome::Changed {
                    state: LayoutModelState {
                        layout: layout.clone(),
                        model: model.clone(),
                        initialized: *initialized,
                    },
                    inserted: Vec::new(),
                });
            }
            Self::SetUpdatePreview { initialized } => {
                if state.initialized == *initialized {
                    return Ok(MutationOutcome::Unchanged);
                }
                let mut next = state.clone();
                next.initialized = *initialized;
                return Ok(MutationOutcome::Changed {
                    state: next,
                    inserted: Vec::new(),
                });
            }
        };

        Ok(edit.into())
    }

    /// Bypass mutations replace the present without entering history
    pub fn records_history(&self) -> bool {
        !matches!(
            self,
            Self::SetLayoutModel { .. } | Self::SetUpdatePreview { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DeleteNode { .. } => "deleteNode",
            Self::DuplicateNode { .. } => "duplicateNode",
            Self::MoveNode { .. } => "moveNode",
            Self::SortNode { .. } => "sortNode",
            Self::ShiftNode { .. } => "shiftNode",
            Self::InsertNodes { .. } => "insertNodes",
            Self::UpdateComponent { .. } => "updateComponent",
            Self::SetLayoutModel { .. } => "setLayoutModel",
            Self::SetUpdatePreview { .. } => "setUpdatePreview",
        }
    }
}

/// Whether the transition `previous → next` belongs in history. Nothing to
/// nothing (hydrating an empty page) never does.
pub fn is_recordable(
    mutation: &LayoutMutation,
    previous: &LayoutModelState,
    next: &LayoutModelState,
) -> bool {
    mutation.records_history() && !(previous.is_empty() && next.is_empty())
}
