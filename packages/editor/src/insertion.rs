//! # Insertion
//!
//! Placing brand-new components and section templates, and turning drag/drop
//! triples `(dragged, target container, index)` into store mutations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::error;
use xb_layout::{
    container_path, find_path_by_uuid, ComponentModel, ComponentModels, ComponentNode,
    LayoutModelPiece, NodePath, RegionNode, ResolvedValues,
};

use crate::mutations::LayoutMutation;
use crate::session::{Action, DispatchResult, EditSession};
use crate::EditorError;

/// What the catalog knows about a component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Component type, e.g. `sdc.card`
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_values: ResolvedValues,
    #[serde(default)]
    pub slots: Vec<String>,
}

impl ComponentDefinition {
    /// Single-node fragment for a fresh instance with empty slots
    pub fn to_piece(&self, uuid: &str) -> LayoutModelPiece {
        let node = self
            .slots
            .iter()
            .fold(ComponentNode::new(uuid, &self.id), |node, slot| {
                node.with_slot(slot, Vec::new())
            });

        let mut model = ComponentModels::new();
        model.insert(
            uuid.to_string(),
            ComponentModel::new(self.default_values.clone()).with_name(&self.name),
        );

        LayoutModelPiece::single(node, model)
    }
}

/// Source of component definitions and section templates
pub trait ComponentCatalog {
    fn component(&self, component_type: &str) -> Option<ComponentDefinition>;
    fn section(&self, section_id: &str) -> Option<LayoutModelPiece>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    components: HashMap<String, ComponentDefinition>,
    sections: HashMap<String, LayoutModelPiece>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, definition: ComponentDefinition) -> Self {
        self.components.insert(definition.id.clone(), definition);
        self
    }

    pub fn with_section(mut self, id: impl Into<String>, piece: LayoutModelPiece) -> Self {
        self.sections.insert(id.into(), piece);
        self
    }
}

impl ComponentCatalog for MemoryCatalog {
    fn component(&self, component_type: &str) -> Option<ComponentDefinition> {
        self.components.get(component_type).cloned()
    }

    fn section(&self, section_id: &str) -> Option<LayoutModelPiece> {
        self.sections.get(section_id).cloned()
    }
}

/// Insertion path for position `index` inside the region or slot `target_id`
pub fn drop_target_path(layout: &[RegionNode], target_id: &str, index: usize) -> Option<NodePath> {
    let mut path = container_path(layout, target_id)?;
    path.push(index);
    Some(path)
}

/// Place a new instance of `component_type` at `to`. Returns its uuid.
pub fn add_new_component_to_layout(
    session: &mut EditSession,
    catalog: &dyn ComponentCatalog,
    component_type: &str,
    to: &[usize],
) -> Result<Option<String>, EditorError> {
    let Some(definition) = catalog.component(component_type) else {
        error!(component_type, "Unknown component type");
        return Ok(None);
    };

    let uuid = session.new_id();
    let result = session.dispatch(Action::Layout(LayoutMutation::InsertNodes {
        to: to.to_vec(),
        piece: definition.to_piece(&uuid),
        forced_uuid: Some(uuid),
    }))?;

    Ok(result.selected().map(str::to_string))
}

/// Place a section template at `to`. Returns the uuids of its top-level
/// nodes in order.
pub fn add_new_section_to_layout(
    session: &mut EditSession,
    catalog: &dyn ComponentCatalog,
    section_id: &str,
    to: &[usize],
) -> Result<Vec<String>, EditorError> {
    let Some(piece) = catalog.section(section_id) else {
        error!(section_id, "Unknown section");
        return Ok(Vec::new());
    };

    let forced_uuid = session.new_id();
    let result = session.dispatch(Action::Layout(LayoutMutation::InsertNodes {
        to: to.to_vec(),
        piece,
        forced_uuid: Some(forced_uuid),
    }))?;

    Ok(result.inserted)
}

/// Drop a palette item into a region or slot
pub fn insert_from_drag(
    session: &mut EditSession,
    catalog: &dyn ComponentCatalog,
    component_type: &str,
    target_id: &str,
    index: usize,
) -> Result<Option<String>, EditorError> {
    let Some(to) = drop_target_path(&session.layout_model().layout, target_id, index) else {
        error!(target_id, "Drop target is not a region or slot");
        return Ok(None);
    };
    add_new_component_to_layout(session, catalog, component_type, &to)
}

/// Drop an existing component at position `index` of a region or slot. The
/// index counts the dragged node where it currently sits.
pub fn move_from_drag(
    session: &mut EditSession,
    uuid: &str,
    target_id: &str,
    index: usize,
) -> Result<DispatchResult, EditorError> {
    let layout = &session.layout_model().layout;
    let (Some(from), Some(to)) = (
        find_path_by_uuid(layout, uuid),
        drop_target_path(layout, target_id, index),
    ) else {
        error!(uuid, target_id, "Cannot move: unknown node or drop target");
        return Ok(DispatchResult::default());
    };

    let same_parent = from.len() == to.len() && from[..from.len() - 1] == to[..to.len() - 1];
    let mutation = if same_parent {
        let current = from[from.len() - 1];
        let to = if index > current { index - 1 } else { index };
        LayoutMutation::SortNode {
            uuid: uuid.to_string(),
            to,
        }
    } else {
        LayoutMutation::MoveNode {
            uuid: uuid.to_string(),
            to,
        }
    };

    session.dispatch(Action::Layout(mutation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use serde_json::json;
    use crate::page_data::PageDataAction;
    use xb_layout::{find_by_uuid, validate_layout_model};

    fn catalog() -> MemoryCatalog {
        let card = ComponentDefinition {
            id: "sdc.card".to_string(),
            name: "Card".to_string(),
            default_values: json!({ "heading": "Title" }).as_object().cloned().unwrap(),
            slots: vec!["body".to_string(), "footer".to_string()],
        };
        let hero = LayoutModelPiece {
            layout: vec![
                ComponentNode::new("h1", "sdc.heading"),
                ComponentNode::new("h2", "sdc.image"),
            ],
            model: ComponentModels::new(),
        };
        MemoryCatalog::new().with_component(card).with_section("hero", hero)
    }

    fn session() -> EditSession {
        let config = EditorConfig {
            deterministic_ids: true,
            ..EditorConfig::default()
        };
        EditSession::new("insertion", &config)
    }

    #[test]
    fn test_definition_piece_has_empty_slots() {
        let piece = catalog().component("sdc.card").unwrap().to_piece("u");
        assert_eq!(piece.layout[0].slots.len(), 2);
        assert_eq!(piece.layout[0].slots[1].id, "u/footer");
        assert_eq!(piece.model["u"].name.as_deref(), Some("Card"));
        assert_eq!(piece.model["u"].resolved["heading"], "Title");
    }

    #[test]
    fn test_add_new_component_returns_uuid() {
        let mut session = session();
        let uuid = add_new_component_to_layout(&mut session, &catalog(), "sdc.card", &[0, 0])
            .unwrap()
            .unwrap();

        assert_eq!(uuid, "xb-1");
        assert!(find_by_uuid(&session.layout_model().layout, "xb-1/body").is_some());
        assert_eq!(session.layout_model().model["xb-1"].resolved["heading"], "Title");
    }

    #[test]
    fn test_unknown_component_is_noop() {
        let mut session = session();
        let uuid = add_new_component_to_layout(&mut session, &catalog(), "sdc.nope", &[0, 0]).unwrap();
        assert_eq!(uuid, None);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_add_section_keeps_order() {
        let mut session = session();
        let inserted = add_new_section_to_layout(&mut session, &catalog(), "hero", &[0, 0]).unwrap();

        assert_eq!(inserted.len(), 2);
        assert_eq!(inserted[0], "xb-1");
        let types: Vec<_> = session.layout_model().layout[0]
            .components
            .iter()
            .map(|c| c.component_type.clone())
            .collect();
        assert_eq!(types, vec!["sdc.heading", "sdc.image"]);
        assert!(validate_layout_model(&session.layout_model().to_root()).is_empty());
        assert_eq!(session.layout_model().model["xb-2"].name.as_deref(), Some("sdc.image"));
    }

    #[test]
    fn test_insert_from_drag_into_slot() {
        let mut session = session();
        let card = insert_from_drag(&mut session, &catalog(), "sdc.card", "content", 0)
            .unwrap()
            .unwrap();
        let nested = insert_from_drag(&mut session, &catalog(), "sdc.card", &format!("{}/footer", card), 0)
            .unwrap()
            .unwrap();

        assert_eq!(
            find_path_by_uuid(&session.layout_model().layout, &nested),
            Some(vec![0, 0, 1, 0])
        );
        assert_eq!(
            insert_from_drag(&mut session, &catalog(), "sdc.card", &card, 0).unwrap(),
            None
        );
    }

    #[test]
    fn test_move_from_drag_within_and_across_parents() {
        let mut session = session();
        let first = insert_from_drag(&mut session, &catalog(), "sdc.card", "content", 0)
            .unwrap()
            .unwrap();
        let second = insert_from_drag(&mut session, &catalog(), "sdc.card", "content", 1)
            .unwrap()
            .unwrap();

        // Dropping below the second card, in pre-move positions
        move_from_drag(&mut session, &first, "content", 2).unwrap();
        let order: Vec<_> = session.layout_model().layout[0]
            .components
            .iter()
            .map(|c| c.uuid.clone())
            .collect();
        assert_eq!(order, vec![second.clone(), first.clone()]);

        move_from_drag(&mut session, &first, &format!("{}/body", second), 0).unwrap();
        assert_eq!(
            find_path_by_uuid(&session.layout_model().layout, &first),
            Some(vec![0, 0, 0, 0])
        );
    }

    #[test]
    fn test_drop_in_place_keeps_redo() {
        let mut session = session();
        let first = insert_from_drag(&mut session, &catalog(), "sdc.card", "content", 0)
            .unwrap()
            .unwrap();
        insert_from_drag(&mut session, &catalog(), "sdc.card", "content", 1)
            .unwrap()
            .unwrap();
        session
            .dispatch(Action::PageData(PageDataAction::SetField {
                name: "title".to_string(),
                value: json!("B"),
            }))
            .unwrap();
        session.dispatch(Action::Undo).unwrap();
        let undo_depth = session.coordinator().undo_stack().len();

        for index in [0, 1] {
            let result = move_from_drag(&mut session, &first, "content", index).unwrap();
            assert!(!result.changed);
            assert_eq!(result.intent, None);
        }

        assert!(session.can_redo());
        assert!(session.page_data_history().can_redo());
        assert_eq!(session.coordinator().undo_stack().len(), undo_depth);
    }
}
