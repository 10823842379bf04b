use serde::{Deserialize, Serialize};
use std::path::Path;
use xb_layout::{IdGenerator, RegionNode, RootLayoutModel};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "xb.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Past entries kept per slice (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Region a new page starts with, and where pastes without a selection go
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Use `{seed}-{n}` ids instead of random UUIDs
    #[serde(default)]
    pub deterministic_ids: bool,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_region() -> String {
    "content".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn id_generator(&self) -> IdGenerator {
        if self.deterministic_ids {
            IdGenerator::sequential("xb")
        } else {
            IdGenerator::random()
        }
    }

    /// Empty page with the default region
    pub fn initial_layout(&self) -> RootLayoutModel {
        if self.default_region == default_region() {
            return RootLayoutModel::default();
        }
        RootLayoutModel {
            layout: vec![RegionNode::new(&self.default_region, title_case(&self.default_region))],
            ..RootLayoutModel::default()
        }
    }
}

fn title_case(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            default_region: default_region(),
            deterministic_ids: false,
        }
    }
}
