//! # Experience Builder Layout
//!
//! The page data model and the stateless tree operations everything else is
//! built from.
//!
//! ```text
//! RootLayoutModel
//!  ├── layout: [Region]
//!  │     └── components: [Component]
//!  │           └── slots: [Slot]
//!  │                 └── components: [Component] ...
//!  └── model: { uuid → ComponentModel }
//! ```
//!
//! Nodes are addressed by id (region id, component uuid, slot id) or by path
//! (child indices from the region list). See [`tree`] for the path rules.

pub mod error;
pub mod id_generator;
pub mod integrity;
pub mod model;
pub mod node;
pub mod tree;
pub mod visitor;

pub use error::{LayoutError, LayoutResult};
pub use id_generator::IdGenerator;
pub use integrity::{validate_layout_model, IntegrityIssue};
pub use model::{
    ComponentModel, ComponentModels, LayoutModelPiece, PropSource, PropSourceKind, ResolvedValues,
    RootLayoutModel, Sources,
};
pub use node::{slot_id, ComponentNode, LayoutNode, NodeKind, NodeRef, RegionNode, SlotNode};
pub use tree::{
    component_at_path, container_len, container_path, find_by_uuid, find_component,
    find_in_component, find_parent_region, find_path_by_uuid, get_node_depth, insert_at_path,
    insert_shared_at_path, is_child_node, move_to_path, node_at_path, remove_by_uuid,
    replace_uuids_and_update_model, take_at_path, NodePath, ReplacedUuids,
};
pub use visitor::{
    collect_component_uuids, collect_layout_uuids, fill_missing_models, ComponentCounter, Visitor,
};
