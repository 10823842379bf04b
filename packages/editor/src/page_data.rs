//! Page-level form data (title, path alias, and similar) with its own history

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Form field name → value, in field order
pub type PageData = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PageDataAction {
    /// Replace every field
    SetPageData { data: PageData },
    SetField { name: String, value: Value },
    RemoveField { name: String },
    /// Load from the backend without touching history
    HydratePageData { data: PageData },
}

impl PageDataAction {
    /// The new state, or `None` when nothing would change
    pub fn apply(&self, current: &PageData) -> Option<PageData> {
        let next = match self {
            Self::SetPageData { data } | Self::HydratePageData { data } => data.clone(),
            Self::SetField { name, value } => {
                let mut next = current.clone();
                next.insert(name.clone(), value.clone());
                next
            }
            Self::RemoveField { name } => {
                if !current.contains_key(name) {
                    return None;
                }
                let mut next = current.clone();
                next.remove(name);
                next
            }
        };

        (next != *current).then_some(next)
    }

    pub fn records_history(&self) -> bool {
        !matches!(self, Self::HydratePageData { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPageData { .. } => "setPageData",
            Self::SetField { .. } => "setField",
            Self::RemoveField { .. } => "removeField",
            Self::HydratePageData { .. } => "hydratePageData",
        }
    }
}

/// Whether the transition `previous → next` belongs in history
pub fn is_recordable(action: &PageDataAction, previous: &PageData, next: &PageData) -> bool {
    action.records_history() && !(previous.is_empty() && next.is_empty())
}
