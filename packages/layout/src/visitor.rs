use crate::model::{ComponentModel, ComponentModels};
use crate::node::{ComponentNode, RegionNode, SlotNode};

/// Visitor pattern for traversing layout trees immutably
///
/// Default implementations walk the entire tree depth-first, components
/// before their slots. Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_layout(&mut self, regions: &[RegionNode]) {
        walk_layout(self, regions);
    }

    fn visit_region(&mut self, region: &RegionNode) {
        walk_region(self, region);
    }

    fn visit_component(&mut self, component: &ComponentNode) {
        walk_component(self, component);
    }

    fn visit_slot(&mut self, slot: &SlotNode) {
        walk_slot(self, slot);
    }
}

pub fn walk_layout<V: Visitor>(visitor: &mut V, regions: &[RegionNode]) {
    for region in regions {
        visitor.visit_region(region);
    }
}

pub fn walk_region<V: Visitor>(visitor: &mut V, region: &RegionNode) {
    for component in &region.components {
        visitor.visit_component(component);
    }
}

pub fn walk_component<V: Visitor>(visitor: &mut V, component: &ComponentNode) {
    for slot in &component.slots {
        visitor.visit_slot(slot);
    }
}

pub fn walk_slot<V: Visitor>(visitor: &mut V, slot: &SlotNode) {
    for component in &slot.components {
        visitor.visit_component(component);
    }
}

/// Collects component uuids in pre-order
#[derive(Debug, Default)]
pub struct UuidCollector {
    pub uuids: Vec<String>,
}

impl Visitor for UuidCollector {
    fn visit_component(&mut self, component: &ComponentNode) {
        self.uuids.push(component.uuid.clone());
        walk_component(self, component);
    }
}

/// The uuid of `component` followed by every descendant component's uuid
pub fn collect_component_uuids(component: &ComponentNode) -> Vec<String> {
    let mut collector = UuidCollector::default();
    collector.visit_component(component);
    collector.uuids
}

/// Every component uuid in the layout
pub fn collect_layout_uuids(regions: &[RegionNode]) -> Vec<String> {
    let mut collector = UuidCollector::default();
    collector.visit_layout(regions);
    collector.uuids
}

/// Adds a default model entry, named after the component type, for each
/// visited component that has none
struct ModelFiller<'a> {
    model: &'a mut ComponentModels,
    filled: Vec<String>,
}

impl Visitor for ModelFiller<'_> {
    fn visit_component(&mut self, component: &ComponentNode) {
        if !self.model.contains_key(&component.uuid) {
            let entry = ComponentModel::default().with_name(component.component_type.as_str());
            self.model.insert(component.uuid.clone(), entry);
            self.filled.push(component.uuid.clone());
        }
        walk_component(self, component);
    }
}

/// Give every component in the subtree a model entry, returning the uuids
/// that needed one
pub fn fill_missing_models(component: &ComponentNode, model: &mut ComponentModels) -> Vec<String> {
    let mut filler = ModelFiller {
        model,
        filled: Vec::new(),
    };
    filler.visit_component(component);
    filler.filled
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ComponentCounter {
    pub components: usize,
    pub slots: usize,
}

impl Visitor for ComponentCounter {
    fn visit_component(&mut self, component: &ComponentNode) {
        self.components += 1;
        walk_component(self, component);
    }

    fn visit_slot(&mut self, slot: &SlotNode) {
        self.slots += 1;
        walk_slot(self, slot);
    }
}

impl ComponentCounter {
    pub fn count_component(component: &ComponentNode) -> Self {
        let mut counter = Self::default();
        counter.visit_component(component);
        counter
    }

    pub fn count_layout(regions: &[RegionNode]) -> Self {
        let mut counter = Self::default();
        counter.visit_layout(regions);
        counter
    }
}
