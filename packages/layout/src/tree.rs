//! # Tree Utilities
//!
//! Stateless operations over a layout (`&[RegionNode]`).
//!
//! ## Paths
//!
//! A path is the sequence of child indices from the region list down to a
//! node. Indices alternate between component lists and slot lists:
//!
//! ```text
//! [region, component, slot, component, slot, ...]
//! ```
//!
//! so component paths have even length, region and slot paths odd length.
//!
//! ## Failure policy
//!
//! Lookups that find nothing return `None` and log. Operations that are given
//! a path which does not resolve return `LayoutError::PathNotFound`; that is a
//! caller bug, not a data condition.
//!
//! Every operation returns a new layout. Unchanged subtrees are shared with the
//! input through `Arc`; the input itself is never modified.

use crate::error::{LayoutError, LayoutResult};
use crate::id_generator::IdGenerator;
use crate::model::ComponentModels;
use crate::node::{slot_id, ComponentNode, NodeRef, RegionNode, SlotNode};
use std::sync::Arc;
use tracing::warn;

/// Child indices from the region list to a node
pub type NodePath = Vec<usize>;

/// Depth-first search for a region id, component uuid, or slot id
pub fn find_by_uuid<'a>(layout: &'a [RegionNode], id: &str) -> Option<NodeRef<'a>> {
    for region in layout {
        if region.id == id {
            return Some(NodeRef::Region(region));
        }
        if let Some(found) = find_in_components(&region.components, id) {
            return Some(found);
        }
    }
    None
}

/// Depth-first search inside a single component subtree (the component included)
pub fn find_in_component<'a>(component: &'a ComponentNode, id: &str) -> Option<NodeRef<'a>> {
    if component.uuid == id {
        return Some(NodeRef::Component(component));
    }
    for slot in &component.slots {
        if slot.id == id {
            return Some(NodeRef::Slot(slot));
        }
        if let Some(found) = find_in_components(&slot.components, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_components<'a>(components: &'a [Arc<ComponentNode>], id: &str) -> Option<NodeRef<'a>> {
    components
        .iter()
        .find_map(|component| find_in_component(component, id))
}

pub fn find_component<'a>(layout: &'a [RegionNode], uuid: &str) -> Option<&'a ComponentNode> {
    find_by_uuid(layout, uuid).and_then(|node| node.as_component())
}

/// Path from the region list to the node with `id`
pub fn find_path_by_uuid(layout: &[RegionNode], id: &str) -> Option<NodePath> {
    if id.is_empty() {
        warn!("Cannot look up the path of an empty id");
        return None;
    }

    let mut path = Vec::new();
    for (index, region) in layout.iter().enumerate() {
        path.push(index);
        if region.id == id || path_in_components(&region.components, id, &mut path) {
            return Some(path);
        }
        path.pop();
    }

    warn!(id, "No node found with this id");
    None
}

fn path_in_components(components: &[Arc<ComponentNode>], id: &str, path: &mut NodePath) -> bool {
    for (index, component) in components.iter().enumerate() {
        path.push(index);
        if component.uuid == id {
            return true;
        }
        for (slot_index, slot) in component.slots.iter().enumerate() {
            path.push(slot_index);
            if slot.id == id || path_in_components(&slot.components, id, path) {
                return true;
            }
            path.pop();
        }
        path.pop();
    }
    false
}

/// Resolve a path to the node it points at
pub fn node_at_path<'a>(layout: &'a [RegionNode], path: &[usize]) -> Option<NodeRef<'a>> {
    let (&first, rest) = path.split_first()?;
    let mut node = NodeRef::Region(layout.get(first)?);

    for &index in rest {
        node = match node {
            NodeRef::Region(region) => NodeRef::Component(region.components.get(index)?.as_ref()),
            NodeRef::Slot(slot) => NodeRef::Component(slot.components.get(index)?.as_ref()),
            NodeRef::Component(component) => NodeRef::Slot(component.slots.get(index)?),
        };
    }

    Some(node)
}

pub fn component_at_path<'a>(layout: &'a [RegionNode], path: &[usize]) -> Option<&'a ComponentNode> {
    shared_component_at(layout, path).map(Arc::as_ref)
}

fn shared_component_at<'a>(layout: &'a [RegionNode], path: &[usize]) -> Option<&'a Arc<ComponentNode>> {
    let (&first, rest) = path.split_first()?;
    if rest.len() % 2 == 0 {
        return None;
    }

    let mut components = &layout.get(first)?.components;
    let mut rest = rest;
    loop {
        let component = components.get(rest[0])?;
        if rest.len() == 1 {
            return Some(component);
        }
        components = &component.slots.get(rest[1])?.components;
        rest = &rest[2..];
    }
}

/// Number of components held by the region or slot at `container_path`
pub fn container_len(layout: &[RegionNode], container_path: &[usize]) -> Option<usize> {
    match node_at_path(layout, container_path)? {
        NodeRef::Region(region) => Some(region.components.len()),
        NodeRef::Slot(slot) => Some(slot.components.len()),
        NodeRef::Component(_) => None,
    }
}

/// Path of the region or slot with `id`, usable as an insertion target
pub fn container_path(layout: &[RegionNode], id: &str) -> Option<NodePath> {
    let path = find_path_by_uuid(layout, id)?;
    if path.len() % 2 == 1 {
        Some(path)
    } else {
        warn!(id, "Node is a component, not a region or slot");
        None
    }
}

/// Split a component path into its container path and index
fn split_child_path(path: &[usize]) -> LayoutResult<(usize, &[usize])> {
    match path.split_last() {
        Some((&index, container)) if !container.is_empty() => Ok((index, container)),
        _ => Err(LayoutError::invalid_path(
            path,
            "a component path needs a region index and a child index",
        )),
    }
}

/// Mutable access to the component list at `container_path`, copying each
/// shared component along the way
fn container_mut<'a>(
    layout: &'a mut [RegionNode],
    container_path: &[usize],
    full_path: &[usize],
) -> LayoutResult<&'a mut Vec<Arc<ComponentNode>>> {
    let (&first, mut rest) = container_path
        .split_first()
        .ok_or_else(|| LayoutError::invalid_path(full_path, "empty path"))?;

    let region = layout
        .get_mut(first)
        .ok_or_else(|| LayoutError::path_not_found(full_path))?;
    let mut components = &mut region.components;

    while !rest.is_empty() {
        if rest.len() < 2 {
            return Err(LayoutError::invalid_path(
                full_path,
                "components can only be placed in regions and slots",
            ));
        }
        let current = components;
        let component = current
            .get_mut(rest[0])
            .ok_or_else(|| LayoutError::path_not_found(full_path))?;
        let slot = Arc::make_mut(component)
            .slots
            .get_mut(rest[1])
            .ok_or_else(|| LayoutError::path_not_found(full_path))?;
        components = &mut slot.components;
        rest = &rest[2..];
    }

    Ok(components)
}

/// Insert `component` at `path`. The last index is clamped to the length of
/// the target list.
pub fn insert_at_path(
    layout: &[RegionNode],
    path: &[usize],
    component: ComponentNode,
) -> LayoutResult<Vec<RegionNode>> {
    insert_shared_at_path(layout, path, Arc::new(component))
}

pub fn insert_shared_at_path(
    layout: &[RegionNode],
    path: &[usize],
    component: Arc<ComponentNode>,
) -> LayoutResult<Vec<RegionNode>> {
    let (index, container) = split_child_path(path)?;
    let mut next = layout.to_vec();
    let components = container_mut(&mut next, container, path)?;
    let index = index.min(components.len());
    components.insert(index, component);
    Ok(next)
}

/// Remove the component at `path`, returning the new layout and the removed node
pub fn take_at_path(
    layout: &[RegionNode],
    path: &[usize],
) -> LayoutResult<(Vec<RegionNode>, Arc<ComponentNode>)> {
    let (index, container) = split_child_path(path)?;
    let mut next = layout.to_vec();
    let components = container_mut(&mut next, container, path)?;
    if index >= components.len() {
        return Err(LayoutError::path_not_found(path));
    }
    let removed = components.remove(index);
    Ok((next, removed))
}

/// Remove the component with `uuid`. Unchanged copy when it isn't found or
/// isn't a component.
pub fn remove_by_uuid(layout: &[RegionNode], uuid: &str) -> Vec<RegionNode> {
    let Some(path) = find_path_by_uuid(layout, uuid) else {
        return layout.to_vec();
    };

    match take_at_path(layout, &path) {
        Ok((next, _)) => next,
        Err(err) => {
            warn!(uuid, error = %err, "Only components can be removed");
            layout.to_vec()
        }
    }
}

/// Move the component with `uuid` to `to`.
///
/// `to` is computed against the tree *before* the move. The node is inserted
/// at `to` first and the original removed afterwards, with its path adjusted
/// when the insertion shifted it.
pub fn move_to_path(layout: &[RegionNode], uuid: &str, to: &[usize]) -> LayoutResult<Vec<RegionNode>> {
    let from = find_path_by_uuid(layout, uuid)
        .ok_or_else(|| LayoutError::NodeNotFound(uuid.to_string()))?;
    let node = shared_component_at(layout, &from)
        .cloned()
        .ok_or_else(|| LayoutError::NotAComponent(uuid.to_string()))?;

    if to.len() > from.len() && to.starts_with(&from) {
        return Err(LayoutError::MoveIntoSelf(uuid.to_string()));
    }

    let inserted = insert_shared_at_path(layout, to, node)?;
    let original = shift_for_insertion(&from, to);
    let (next, _) = take_at_path(&inserted, &original)?;
    Ok(next)
}

/// Where the node at `from` ends up after something was inserted at `to`
fn shift_for_insertion(from: &[usize], to: &[usize]) -> NodePath {
    let mut shifted = from.to_vec();
    let Some(level) = to.len().checked_sub(1) else {
        return shifted;
    };
    if level < from.len() && from[..level] == to[..level] && to[level] <= from[level] {
        shifted[level] += 1;
    }
    shifted
}

/// A renumbered component subtree and the model entries that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacedUuids {
    pub node: ComponentNode,
    /// Entries of the remapped old uuids, keyed by their new uuids
    pub model: ComponentModels,
}

/// Deep-copy `component`, giving every component in the subtree a fresh uuid
/// and every slot an id derived from its new parent. The root may be pinned
/// to `forced_root_uuid`.
pub fn replace_uuids_and_update_model(
    component: &ComponentNode,
    model: &ComponentModels,
    forced_root_uuid: Option<&str>,
    ids: &mut IdGenerator,
) -> ReplacedUuids {
    let mut updated_model = ComponentModels::new();
    let node = renumber(
        component,
        model,
        forced_root_uuid.map(str::to_string),
        ids,
        &mut updated_model,
    );
    ReplacedUuids {
        node,
        model: updated_model,
    }
}

fn renumber(
    component: &ComponentNode,
    model: &ComponentModels,
    forced_uuid: Option<String>,
    ids: &mut IdGenerator,
    updated_model: &mut ComponentModels,
) -> ComponentNode {
    let uuid = forced_uuid.unwrap_or_else(|| ids.new_id());

    if let Some(entry) = model.get(&component.uuid) {
        updated_model.insert(uuid.clone(), entry.clone());
    }

    let slots = component
        .slots
        .iter()
        .map(|slot| SlotNode {
            id: slot_id(&uuid, &slot.name),
            name: slot.name.clone(),
            components: slot
                .components
                .iter()
                .map(|child| Arc::new(renumber(child, model, None, ids, updated_model)))
                .collect(),
        })
        .collect();

    ComponentNode {
        uuid,
        component_type: component.component_type.clone(),
        slots,
    }
}

/// Whether the node sits below the top level of its region
pub fn is_child_node(layout: &[RegionNode], id: &str) -> Option<bool> {
    find_path_by_uuid(layout, id).map(|path| path.len() > 2)
}

/// Number of components on the way from the region to the node, the node
/// itself included. Regions are depth 0, top-level components depth 1.
pub fn get_node_depth(layout: &[RegionNode], id: &str) -> Option<usize> {
    find_path_by_uuid(layout, id).map(|path| path.len() / 2)
}

pub fn find_parent_region<'a>(layout: &'a [RegionNode], id: &str) -> Option<&'a RegionNode> {
    let path = find_path_by_uuid(layout, id)?;
    layout.get(path[0])
}
