//! Prop data attached to placed components
//!
//! Every component uuid in a layout has one `ComponentModel` entry in the
//! model map. `resolved` holds client-usable prop values; `source` is only
//! present on evaluated models and holds the expressions the backend uses to
//! regenerate `resolved`.

use crate::node::{ComponentNode, RegionNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Prop name → client-usable value
pub type ResolvedValues = Map<String, Value>;

/// Prop name → backend source expression
pub type Sources = HashMap<String, PropSource>;

/// Component uuid → prop data
pub type ComponentModels = HashMap<String, ComponentModel>;

/// Prop data for a single placed component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub resolved: ResolvedValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Sources>,
}

impl ComponentModel {
    pub fn new(resolved: ResolvedValues) -> Self {
        Self {
            name: None,
            resolved,
            source: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: Sources) -> Self {
        self.source = Some(source);
        self
    }

    /// Evaluated models carry backend source expressions
    pub fn is_evaluated(&self) -> bool {
        self.source.is_some()
    }
}

/// How a prop value is produced on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropSource {
    /// `static:<field type>`, `dynamic`, or `adapter:<name>`
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type_settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_inputs: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropSourceKind {
    Static,
    Dynamic,
    Adapted,
    Unknown,
}

impl PropSource {
    pub fn kind(&self) -> PropSourceKind {
        if self.source_type.starts_with("static:") {
            PropSourceKind::Static
        } else if self.source_type == "dynamic" {
            PropSourceKind::Dynamic
        } else if self.source_type.starts_with("adapter:") {
            PropSourceKind::Adapted
        } else {
            PropSourceKind::Unknown
        }
    }
}

/// The full persisted unit: regions plus the model for every component in them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootLayoutModel {
    pub layout: Vec<RegionNode>,
    #[serde(default)]
    pub model: ComponentModels,
}

impl Default for RootLayoutModel {
    /// A single empty `content` region and an empty model
    fn default() -> Self {
        Self {
            layout: vec![RegionNode::new("content", "Content")],
            model: ComponentModels::new(),
        }
    }
}

/// Detached subtree fragment (clipboard, section templates, drag payloads).
/// Never a standalone tree: there is no region wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutModelPiece {
    pub layout: Vec<ComponentNode>,
    #[serde(default)]
    pub model: ComponentModels,
}

impl LayoutModelPiece {
    pub fn single(component: ComponentNode, model: ComponentModels) -> Self {
        Self {
            layout: vec![component],
            model,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }
}
