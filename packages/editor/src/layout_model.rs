//! # Layout Model Store
//!
//! Owns the layout tree and the prop-data model map and keeps the two in
//! step: every component uuid in the tree has exactly one model entry.
//!
//! Each operation reads the current state and produces a complete new one
//! (`LayoutEdit`) or nothing at all:
//!
//! - `Ok(Some(edit))`: the new state, plus the uuids of any inserted
//!   top-level nodes so the caller can select them
//! - `Ok(None)`: bad input (unknown uuid, wrong node kind, malformed path),
//!   logged and ignored
//! - `Err(_)`: a path that should resolve did not; a caller bug

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use xb_layout::{
    collect_component_uuids, component_at_path, container_len, fill_missing_models, find_component,
    find_path_by_uuid, insert_at_path, insert_shared_at_path, move_to_path, remove_by_uuid,
    replace_uuids_and_update_model, take_at_path, ComponentModel, ComponentModels, ComponentNode,
    IdGenerator, LayoutError, LayoutModelPiece, RegionNode, RootLayoutModel,
};

/// Present state of the layout slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutModelState {
    pub layout: Vec<RegionNode>,
    pub model: ComponentModels,
    /// A preview re-render is owed
    pub initialized: bool,
}

impl Default for LayoutModelState {
    fn default() -> Self {
        Self::from_root(RootLayoutModel::default(), false)
    }
}

/// Direction for `shift_node`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A successful layout edit
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdit {
    pub state: LayoutModelState,
    /// Uuids of inserted top-level nodes, in destination order
    pub inserted: Vec<String>,
}

pub type EditResult = Result<Option<LayoutEdit>, LayoutError>;

impl LayoutEdit {
    fn changed(layout: Vec<RegionNode>, model: ComponentModels) -> Self {
        Self {
            state: LayoutModelState {
                layout,
                model,
                initialized: true,
            },
            inserted: Vec::new(),
        }
    }

    fn with_inserted(mut self, inserted: Vec<String>) -> Self {
        self.inserted = inserted;
        self
    }
}

/// Log recoverable tree errors as no-ops and pass the rest through
fn recover(uuid: &str, operation: &str, err: LayoutError) -> EditResult {
    if err.is_recoverable() {
        error!(uuid, operation, error = %err, "Ignoring invalid layout edit");
        Ok(None)
    } else {
        Err(err)
    }
}

/// Inserted components always get a model entry, even when the source
/// fragment had none for them
fn cover_models(component: &ComponentNode, model: &mut ComponentModels) {
    let filled = fill_missing_models(component, model);
    if !filled.is_empty() {
        debug!(uuids = ?filled, "Added default models for components without one");
    }
}

impl LayoutModelState {
    pub fn from_root(root: RootLayoutModel, initialized: bool) -> Self {
        Self {
            layout: root.layout,
            model: root.model,
            initialized,
        }
    }

    pub fn to_root(&self) -> RootLayoutModel {
        RootLayoutModel {
            layout: self.layout.clone(),
            model: self.model.clone(),
        }
    }

    /// No components and no model entries
    pub fn is_empty(&self) -> bool {
        self.model.is_empty() && self.layout.iter().all(|region| region.components.is_empty())
    }

    /// Remove a component, its descendants, and all of their model entries
    pub fn delete_node(&self, uuid: &str) -> EditResult {
        let Some(component) = find_component(&self.layout, uuid) else {
            error!(uuid, "Cannot delete: no component with this uuid");
            return Ok(None);
        };

        let mut model = self.model.clone();
        for removed in collect_component_uuids(component) {
            model.remove(&removed);
        }

        Ok(Some(LayoutEdit::changed(remove_by_uuid(&self.layout, uuid), model)))
    }

    /// Insert an independent copy right after the original
    pub fn duplicate_node(&self, uuid: &str, ids: &mut IdGenerator) -> EditResult {
        let Some(mut path) = find_path_by_uuid(&self.layout, uuid) else {
            error!(uuid, "Cannot duplicate: no node with this uuid");
            return Ok(None);
        };
        let Some(component) = component_at_path(&self.layout, &path) else {
            error!(uuid, "Cannot duplicate: only components can be duplicated");
            return Ok(None);
        };

        let copy = replace_uuids_and_update_model(component, &self.model, None, ids);
        let new_uuid = copy.node.uuid.clone();
        let mut model = self.model.clone();
        model.extend(copy.model);
        cover_models(&copy.node, &mut model);

        if let Some(last) = path.last_mut() {
            *last += 1;
        }
        let layout = insert_at_path(&self.layout, &path, copy.node)?;

        Ok(Some(LayoutEdit::changed(layout, model).with_inserted(vec![new_uuid])))
    }

    /// Move a component to `to`, a path computed against the current tree
    pub fn move_node(&self, uuid: &str, to: &[usize]) -> EditResult {
        if uuid.is_empty() || to.is_empty() {
            error!(uuid, to = ?to, "Cannot move: missing uuid or destination");
            return Ok(None);
        }
        if let Some(from) = find_path_by_uuid(&self.layout, uuid) {
            if self.lands_in_place(&from, to) {
                debug!(uuid, to = ?to, "Node is already at the destination");
                return Ok(None);
            }
        }

        match move_to_path(&self.layout, uuid, to) {
            Ok(layout) => Ok(Some(LayoutEdit::changed(layout, self.model.clone()))),
            Err(err) => recover(uuid, "move", err),
        }
    }

    /// Reorder a component within its current parent. `to_index` is the
    /// position among the siblings once the node itself is taken out.
    pub fn sort_node(&self, uuid: &str, to_index: usize) -> EditResult {
        let Some(mut path) = find_path_by_uuid(&self.layout, uuid) else {
            error!(uuid, "Cannot sort: no node with this uuid");
            return Ok(None);
        };
        if path.len() % 2 == 1 {
            error!(uuid, "Cannot sort: only components can be reordered");
            return Ok(None);
        }

        let Some((&current, parent)) = path.split_last() else {
            return Ok(None);
        };
        let siblings = container_len(&self.layout, parent)
            .ok_or_else(|| LayoutError::path_not_found(parent))?;
        if to_index.min(siblings.saturating_sub(1)) == current {
            debug!(uuid, to_index, "Node is already at this position");
            return Ok(None);
        }

        let (layout, node) = take_at_path(&self.layout, &path)?;
        if let Some(last) = path.last_mut() {
            *last = to_index;
        }
        let layout = insert_shared_at_path(&layout, &path, node)?;

        Ok(Some(LayoutEdit::changed(layout, self.model.clone())))
    }

    /// Move a component one position among its siblings. Stays put at either end.
    pub fn shift_node(&self, uuid: &str, direction: Direction) -> EditResult {
        let Some(path) = find_path_by_uuid(&self.layout, uuid) else {
            error!(uuid, "Cannot shift: no node with this uuid");
            return Ok(None);
        };
        let Some((&index, parent)) = path.split_last() else {
            return Ok(None);
        };
        if path.len() % 2 == 1 {
            error!(uuid, "Cannot shift: only components can be reordered");
            return Ok(None);
        }

        let siblings = container_len(&self.layout, parent)
            .ok_or_else(|| LayoutError::path_not_found(parent))?;
        let target = match direction {
            Direction::Up => index.saturating_sub(1),
            Direction::Down => (index + 1).min(siblings.saturating_sub(1)),
        };

        if target == index {
            debug!(uuid, ?direction, "Node already at the edge of its parent");
            return Ok(None);
        }

        self.sort_node(uuid, target)
    }

    /// Insert every node of `piece` at `to`, keeping the piece's order, with
    /// fresh uuids throughout. The first node can be pinned to `forced_uuid`.
    pub fn insert_nodes(
        &self,
        to: &[usize],
        piece: &LayoutModelPiece,
        forced_uuid: Option<&str>,
        ids: &mut IdGenerator,
    ) -> EditResult {
        if to.is_empty() || piece.is_empty() {
            error!(to = ?to, nodes = piece.layout.len(), "Cannot insert: missing destination or nodes");
            return Ok(None);
        }
        if let Some(forced) = forced_uuid {
            if self.model.contains_key(forced) || find_component(&self.layout, forced).is_some() {
                error!(uuid = forced, "Cannot insert: uuid is already in use");
                return Ok(None);
            }
        }

        let mut layout = self.layout.clone();
        let mut model = self.model.clone();
        let mut inserted = Vec::with_capacity(piece.layout.len());

        // Inserting each node at the same index in reverse keeps the piece's order
        for (index, node) in piece.layout.iter().enumerate().rev() {
            let forced = if index == 0 { forced_uuid } else { None };
            let copy = replace_uuids_and_update_model(node, &piece.model, forced, ids);
            let uuid = copy.node.uuid.clone();
            model.extend(copy.model);
            cover_models(&copy.node, &mut model);
            layout = match insert_shared_at_path(&layout, to, Arc::new(copy.node)) {
                Ok(layout) => layout,
                Err(err) => return recover(&uuid, "insert", err),
            };
            inserted.push(uuid);
        }
        inserted.reverse();

        Ok(Some(LayoutEdit::changed(layout, model).with_inserted(inserted)))
    }

    /// Whether inserting at `to` (against the current tree) and removing the
    /// original at `from` leaves the tree as it is
    fn lands_in_place(&self, from: &[usize], to: &[usize]) -> bool {
        let (Some((&current, parent)), Some((&target, to_parent))) = (from.split_last(), to.split_last())
        else {
            return false;
        };
        if parent != to_parent {
            return false;
        }
        let Some(siblings) = container_len(&self.layout, parent) else {
            return false;
        };
        let target = target.min(siblings);
        target == current || target == current + 1
    }

    /// Replace one component's prop data
    pub fn update_component(&self, uuid: &str, component_model: &ComponentModel) -> EditResult {
        if find_component(&self.layout, uuid).is_none() {
            error!(uuid, "Cannot update: no component with this uuid");
            return Ok(None);
        }
        if self.model.get(uuid) == Some(component_model) {
            return Ok(None);
        }

        let mut model = self.model.clone();
        model.insert(uuid.to_string(), component_model.clone());
        Ok(Some(LayoutEdit::changed(self.layout.clone(), model)))
    }
}
