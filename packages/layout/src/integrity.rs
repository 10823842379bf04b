//! Consistency checks between a layout and its model map

use crate::model::{ComponentModels, RootLayoutModel};
use crate::node::{slot_id, ComponentNode};
use crate::visitor::{walk_component, Visitor};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum IntegrityIssue {
    /// Component in the tree without a model entry
    MissingModel { uuid: String },
    /// Model entry without a component in the tree
    OrphanModel { uuid: String },
    DuplicateUuid { uuid: String },
    SlotIdMismatch { slot_id: String, expected: String },
}

struct IntegrityVisitor<'a> {
    model: &'a ComponentModels,
    seen: HashSet<String>,
    issues: Vec<IntegrityIssue>,
}

impl Visitor for IntegrityVisitor<'_> {
    fn visit_component(&mut self, component: &ComponentNode) {
        if !self.seen.insert(component.uuid.clone()) {
            self.issues.push(IntegrityIssue::DuplicateUuid {
                uuid: component.uuid.clone(),
            });
        }
        if !self.model.contains_key(&component.uuid) {
            self.issues.push(IntegrityIssue::MissingModel {
                uuid: component.uuid.clone(),
            });
        }
        for slot in &component.slots {
            let expected = slot_id(&component.uuid, &slot.name);
            if slot.id != expected {
                self.issues.push(IntegrityIssue::SlotIdMismatch {
                    slot_id: slot.id.clone(),
                    expected,
                });
            }
        }
        walk_component(self, component);
    }
}

/// Every way `root` breaks the one-model-entry-per-component invariant
pub fn validate_layout_model(root: &RootLayoutModel) -> Vec<IntegrityIssue> {
    let mut visitor = IntegrityVisitor {
        model: &root.model,
        seen: HashSet::new(),
        issues: Vec::new(),
    };
    visitor.visit_layout(&root.layout);

    let mut orphans: Vec<&String> = root
        .model
        .keys()
        .filter(|uuid| !visitor.seen.contains(*uuid))
        .collect();
    orphans.sort();

    let mut issues = visitor.issues;
    issues.extend(orphans.into_iter().map(|uuid| IntegrityIssue::OrphanModel {
        uuid: uuid.clone(),
    }));
    issues
}
