//! Layout tree nodes
//!
//! A page is a list of regions. Regions and slots hold components, components
//! hold slots, so the two kinds alternate strictly by depth:
//!
//! ```text
//! Region → Component → Slot → Component → Slot → ...
//! ```
//!
//! Children are stored behind `Arc` so a clone of the whole tree is shallow.
//! Tree operations copy only the nodes along the path they change
//! (`Arc::make_mut`), which leaves every previously returned tree untouched.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Top-level named placement area of a page (e.g. `content`, `header`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub components: Vec<Arc<ComponentNode>>,
}

/// Placed instance of a component definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Unique across the whole tree; the key into the model map
    pub uuid: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub slots: Vec<SlotNode>,
}

/// Named child-holder owned by exactly one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotNode {
    /// Always `{parent_uuid}/{name}`
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub components: Vec<Arc<ComponentNode>>,
}

/// Build the id of a slot from its owning component's uuid
pub fn slot_id(parent_uuid: &str, slot_name: &str) -> String {
    format!("{}/{}", parent_uuid, slot_name)
}

impl RegionNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: ComponentNode) -> Self {
        self.components.push(Arc::new(component));
        self
    }
}

impl ComponentNode {
    pub fn new(uuid: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            component_type: component_type.into(),
            slots: Vec::new(),
        }
    }

    /// Append a slot whose id is derived from this component's uuid
    pub fn with_slot(mut self, name: &str, components: Vec<ComponentNode>) -> Self {
        let mut slot = SlotNode::new(&self.uuid, name);
        slot.components = components.into_iter().map(Arc::new).collect();
        self.slots.push(slot);
        self
    }

    pub fn slot(&self, name: &str) -> Option<&SlotNode> {
        self.slots.iter().find(|slot| slot.name == name)
    }
}

impl SlotNode {
    pub fn new(parent_uuid: &str, name: &str) -> Self {
        Self {
            id: slot_id(parent_uuid, name),
            name: name.to_string(),
            components: Vec::new(),
        }
    }
}

/// The three node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Region,
    Component,
    Slot,
}

/// Owned node of any kind, tagged with `nodeType` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "lowercase")]
pub enum LayoutNode {
    Region(RegionNode),
    Component(ComponentNode),
    Slot(SlotNode),
}

impl LayoutNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            LayoutNode::Region(_) => NodeKind::Region,
            LayoutNode::Component(_) => NodeKind::Component,
            LayoutNode::Slot(_) => NodeKind::Slot,
        }
    }

    /// Region id, component uuid, or slot id
    pub fn id(&self) -> &str {
        match self {
            LayoutNode::Region(region) => &region.id,
            LayoutNode::Component(component) => &component.uuid,
            LayoutNode::Slot(slot) => &slot.id,
        }
    }
}

/// Borrowed view of a node found inside a tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Region(&'a RegionNode),
    Component(&'a ComponentNode),
    Slot(&'a SlotNode),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Region(_) => NodeKind::Region,
            NodeRef::Component(_) => NodeKind::Component,
            NodeRef::Slot(_) => NodeKind::Slot,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            NodeRef::Region(region) => &region.id,
            NodeRef::Component(component) => &component.uuid,
            NodeRef::Slot(slot) => &slot.id,
        }
    }

    pub fn as_component(&self) -> Option<&'a ComponentNode> {
        match *self {
            NodeRef::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn to_owned_node(&self) -> LayoutNode {
        match *self {
            NodeRef::Region(region) => LayoutNode::Region(region.clone()),
            NodeRef::Component(component) => LayoutNode::Component(component.clone()),
            NodeRef::Slot(slot) => LayoutNode::Slot(slot.clone()),
        }
    }
}
