//! # Preview Pipeline
//!
//! Hands the current tree, model and page data to the preview backend
//! whenever the layout slice owes a render, and caches the markup it returns.
//!
//! ```text
//! dispatch ──▶ layout dirty? ──▶ PreviewRequest ──▶ PreviewService::render
//!                                                        │
//!                                         last_markup ◀──┘
//! ```
//!
//! The backend is a collaborator: its failures are handed back to the caller
//! as-is and never roll editor state back.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use xb_layout::{ComponentModel, ComponentModels, RegionNode, RootLayoutModel};

use crate::layout_model::LayoutModelState;
use crate::page_data::PageData;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    #[error("Preview request rejected: {0}")]
    Rejected(String),

    #[error("Preview service unavailable")]
    Unavailable,
}

/// Snapshot sent to the preview backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub layout: Vec<RegionNode>,
    pub model: ComponentModels,
    #[serde(rename = "pageFormFields")]
    pub page_data: PageData,
}

impl PreviewRequest {
    pub fn new(state: &LayoutModelState, page_data: &PageData) -> Self {
        Self {
            layout: state.layout.clone(),
            model: state.model.clone(),
            page_data: page_data.clone(),
        }
    }
}

/// Server-side renderer and persistence endpoint
pub trait PreviewService {
    /// Render the full page
    fn render(&mut self, request: &PreviewRequest) -> Result<String, PreviewError>;

    /// Apply one component's model server-side and return the confirmed pair
    fn patch_component(
        &mut self,
        uuid: &str,
        model: &ComponentModel,
        current: &RootLayoutModel,
    ) -> Result<RootLayoutModel, PreviewError>;
}

/// Backend for sessions with nothing to render to. Renders nothing and
/// confirms patches by applying them locally.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPreview;

impl PreviewService for NullPreview {
    fn render(&mut self, _request: &PreviewRequest) -> Result<String, PreviewError> {
        Ok(String::new())
    }

    fn patch_component(
        &mut self,
        uuid: &str,
        model: &ComponentModel,
        current: &RootLayoutModel,
    ) -> Result<RootLayoutModel, PreviewError> {
        let mut confirmed = current.clone();
        confirmed.model.insert(uuid.to_string(), model.clone());
        Ok(confirmed)
    }
}

/// Drives the preview service and remembers its last answer
pub struct PreviewPipeline {
    service: Box<dyn PreviewService>,
    last_markup: Option<String>,
    renders: usize,
}

impl PreviewPipeline {
    pub fn new(service: Box<dyn PreviewService>) -> Self {
        Self {
            service,
            last_markup: None,
            renders: 0,
        }
    }

    /// Re-render from the given state
    pub fn refresh(
        &mut self,
        state: &LayoutModelState,
        page_data: &PageData,
    ) -> Result<&str, PreviewError> {
        let request = PreviewRequest::new(state, page_data);
        match self.service.render(&request) {
            Ok(markup) => {
                self.renders += 1;
                debug!(renders = self.renders, bytes = markup.len(), "Preview refreshed");
                Ok(self.last_markup.insert(markup).as_str())
            }
            Err(err) => {
                warn!(error = %err, "Preview render failed");
                Err(err)
            }
        }
    }

    pub fn patch_component(
        &mut self,
        uuid: &str,
        model: &ComponentModel,
        current: &RootLayoutModel,
    ) -> Result<RootLayoutModel, PreviewError> {
        self.service.patch_component(uuid, model, current)
    }

    pub fn last_markup(&self) -> Option<&str> {
        self.last_markup.as_deref()
    }

    /// Successful renders so far
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Forget the cached markup
    pub fn clear_cache(&mut self) {
        self.last_markup = None;
    }
}

impl Default for PreviewPipeline {
    fn default() -> Self {
        Self::new(Box::new(NullPreview))
    }
}

impl std::fmt::Debug for PreviewPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewPipeline")
            .field("last_markup", &self.last_markup)
            .field("renders", &self.renders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xb_layout::ComponentNode;

    struct CountingPreview {
        fail: bool,
    }

    impl PreviewService for CountingPreview {
        fn render(&mut self, request: &PreviewRequest) -> Result<String, PreviewError> {
            if self.fail {
                return Err(PreviewError::Rejected("bad gateway".to_string()));
            }
            Ok(format!("<main>{}</main>", request.model.len()))
        }

        fn patch_component(
            &mut self,
            _uuid: &str,
            _model: &ComponentModel,
            _current: &RootLayoutModel,
        ) -> Result<RootLayoutModel, PreviewError> {
            Err(PreviewError::Unavailable)
        }
    }

    fn state() -> LayoutModelState {
        let mut state = LayoutModelState::default();
        state.layout[0] = state.layout[0].clone().with_component(ComponentNode::new("a", "sdc.text"));
        state.model.insert("a".to_string(), ComponentModel::default());
        state
    }

    #[test]
    fn test_refresh_caches_markup() {
        let mut pipeline = PreviewPipeline::new(Box::new(CountingPreview { fail: false }));
        assert_eq!(pipeline.last_markup(), None);

        let markup = pipeline.refresh(&state(), &PageData::new()).unwrap().to_string();
        assert_eq!(markup, "<main>1</main>");
        assert_eq!(pipeline.last_markup(), Some("<main>1</main>"));
        assert_eq!(pipeline.renders(), 1);

        pipeline.clear_cache();
        assert_eq!(pipeline.last_markup(), None);
    }

    #[test]
    fn test_failed_render_keeps_previous_markup() {
        let mut pipeline = PreviewPipeline::new(Box::new(CountingPreview { fail: false }));
        pipeline.refresh(&state(), &PageData::new()).unwrap();

        pipeline.service = Box::new(CountingPreview { fail: true });
        let err = pipeline.refresh(&state(), &PageData::new()).unwrap_err();

        assert_eq!(err, PreviewError::Rejected("bad gateway".to_string()));
        assert_eq!(pipeline.last_markup(), Some("<main>1</main>"));
        assert_eq!(pipeline.renders(), 1);
    }

    #[test]
    fn test_request_uses_page_form_fields_key() {
        let mut page_data = PageData::new();
        page_data.insert("title".to_string(), json!("Home"));

        let value = serde_json::to_value(PreviewRequest::new(&state(), &page_data)).unwrap();
        assert_eq!(value["pageFormFields"]["title"], "Home");
        assert!(value["layout"].is_array());
        assert!(value["model"]["a"].is_object());
    }

    #[test]
    fn test_null_preview_applies_patch_locally() {
        let mut pipeline = PreviewPipeline::default();
        let current = state().to_root();
        let next = ComponentModel::new(json!({ "text": "Hi" }).as_object().cloned().unwrap());

        let confirmed = pipeline.patch_component("a", &next, &current).unwrap();
        assert_eq!(confirmed.model["a"], next);
        assert_eq!(confirmed.layout, current.layout);
    }
}
