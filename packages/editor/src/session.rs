//! # Edit Session
//!
//! Single entry point for every change to the editor state.
//!
//! An `EditSession` owns both historied slices, the coordinator that orders
//! them on one timeline, the id generator and the preview pipeline. A slice
//! action flows through:
//!
//! ```text
//! reduce ─▶ filter ─▶ record ─▶ coordinator.record(tag) ─▶ broadcast Recorded(tag)
//!              │                                                    │
//!              └──▶ replace (bypass) ──────────────────────────────▶ preview if dirty
//! ```
//!
//! Undo and redo ask the coordinator which slice to step and step only that
//! slice's history.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use xb_layout::{ComponentModel, IdGenerator, RootLayoutModel};

use crate::config::EditorConfig;
use crate::events::{broadcast, SliceEvent, SliceObserver};
use crate::history::History;
use crate::layout_model::LayoutModelState;
use crate::mutations::{self, LayoutMutation, MutationOutcome};
use crate::page_data::{self, PageData, PageDataAction};
use crate::pipeline::{PreviewError, PreviewPipeline, PreviewService};
use crate::undo_redo::{HistoryIntent, SliceTag, UndoRedoCoordinator};
use crate::EditorError;

/// Anything that can be dispatched to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "camelCase")]
pub enum Action {
    Layout(LayoutMutation),
    PageData(PageDataAction),
    Undo,
    Redo,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Layout(mutation) => mutation.name(),
            Self::PageData(action) => action.name(),
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// What a dispatch did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    /// The present of some slice changed
    pub changed: bool,

    /// History step taken, if any
    pub intent: Option<HistoryIntent>,

    /// Uuids of inserted top-level nodes, for the caller to select
    pub inserted: Vec<String>,

    /// The preview backend failed. Editor state is kept regardless.
    pub preview_error: Option<PreviewError>,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    /// Uuid of the first inserted node
    pub fn selected(&self) -> Option<&str> {
        self.inserted.first().map(String::as_str)
    }
}

pub struct EditSession {
    id: String,
    layout: History<LayoutModelState>,
    page_data: History<PageData>,
    coordinator: UndoRedoCoordinator,
    ids: IdGenerator,
    preview: PreviewPipeline,
    default_region: String,
}

impl EditSession {
    pub fn new(id: impl Into<String>, config: &EditorConfig) -> Self {
        let initial = LayoutModelState::from_root(config.initial_layout(), false);

        Self {
            id: id.into(),
            layout: History::with_limit(SliceTag::LayoutModel, initial, config.history_limit),
            page_data: History::with_limit(
                SliceTag::PageData,
                PageData::new(),
                config.history_limit,
            ),
            coordinator: UndoRedoCoordinator::new(),
            ids: config.id_generator(),
            preview: PreviewPipeline::default(),
            default_region: config.default_region.clone(),
        }
    }

    pub fn with_preview(mut self, service: Box<dyn PreviewService>) -> Self {
        self.preview = PreviewPipeline::new(service);
        self
    }

    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Load server state without creating history entries
    pub fn hydrate(&mut self, root: RootLayoutModel, page_data: PageData) -> Result<(), EditorError> {
        info!(session = %self.id, regions = root.layout.len(), "Hydrating session");

        self.dispatch(Action::Layout(LayoutMutation::SetLayoutModel {
            layout: root.layout,
            model: root.model,
            initialized: false,
        }))?;
        self.dispatch(Action::PageData(PageDataAction::HydratePageData { data: page_data }))?;
        Ok(())
    }

    #[instrument(skip_all, fields(session = %self.id, action = action.name()))]
    pub fn dispatch(&mut self, action: Action) -> Result<DispatchResult, EditorError> {
        let mut result = match action {
            Action::Layout(mutation) => self.apply_layout(&mutation)?,
            Action::PageData(action) => self.apply_page_data(&action),
            Action::Undo => {
                let intent = self.coordinator.request_undo(&mut self.ids);
                self.step(intent)
            }
            Action::Redo => {
                let intent = self.coordinator.request_redo(&mut self.ids);
                self.step(intent)
            }
        };

        if result.changed {
            result.preview_error = self.refresh_preview();
        }
        Ok(result)
    }

    fn apply_layout(&mut self, mutation: &LayoutMutation) -> Result<DispatchResult, EditorError> {
        let (next, inserted) = match mutation.apply(self.layout.present(), &mut self.ids)? {
            MutationOutcome::Changed { state, inserted } => (state, inserted),
            MutationOutcome::Unchanged => return Ok(DispatchResult::unchanged()),
        };

        let intent = if mutations::is_recordable(mutation, self.layout.present(), &next) {
            let evicted = self.layout.record(next).evicted;
            Some(self.recorded(SliceTag::LayoutModel, evicted))
        } else {
            self.layout.replace(next);
            None
        };

        Ok(DispatchResult {
            changed: true,
            intent,
            inserted,
            preview_error: None,
        })
    }

    fn apply_page_data(&mut self, action: &PageDataAction) -> DispatchResult {
        let Some(next) = action.apply(self.page_data.present()) else {
            debug!(action = action.name(), "Page data unchanged");
            return DispatchResult::unchanged();
        };

        let intent = if page_data::is_recordable(action, self.page_data.present(), &next) {
            let evicted = self.page_data.record(next).evicted;
            Some(self.recorded(SliceTag::PageData, evicted))
        } else {
            self.page_data.replace(next);
            None
        };

        DispatchResult {
            changed: true,
            intent,
            ..DispatchResult::default()
        }
    }

    /// Bookkeeping after `tag`'s history recorded
    fn recorded(&mut self, tag: SliceTag, evicted: bool) -> HistoryIntent {
        if evicted {
            self.coordinator.forget_oldest(tag);
        }
        let intent = self.coordinator.record(tag);

        let mut observers: [&mut dyn SliceObserver; 2] = [&mut self.layout, &mut self.page_data];
        broadcast(SliceEvent::Recorded(tag), &mut observers);

        intent
    }

    fn step(&mut self, intent: Option<HistoryIntent>) -> DispatchResult {
        let Some(intent) = intent else {
            debug!("Nothing to step");
            return DispatchResult::unchanged();
        };

        let stepped = match intent {
            HistoryIntent::Undo(SliceTag::LayoutModel) => self.layout.undo(),
            HistoryIntent::Undo(SliceTag::PageData) => self.page_data.undo(),
            HistoryIntent::Redo(SliceTag::LayoutModel) => self.layout.redo(),
            HistoryIntent::Redo(SliceTag::PageData) => self.page_data.redo(),
            HistoryIntent::Record(_) => false,
        };

        if !stepped {
            warn!(?intent, "Coordinator and slice history disagree");
        }

        DispatchResult {
            changed: stepped,
            intent: Some(intent),
            ..DispatchResult::default()
        }
    }

    fn refresh_preview(&mut self) -> Option<PreviewError> {
        if !self.layout.present().initialized {
            return None;
        }
        self.preview
            .refresh(self.layout.present(), self.page_data.present())
            .err()
    }

    /// Accept a server-confirmed pair. Bypasses history and does not ask for
    /// another render.
    pub fn reconcile(&mut self, root: RootLayoutModel) {
        debug!(session = %self.id, "Reconciling with server state");
        self.layout.replace(LayoutModelState::from_root(root, false));
    }

    /// Edit one component's props locally, then let the backend confirm
    pub fn patch_component(
        &mut self,
        uuid: &str,
        model: ComponentModel,
    ) -> Result<DispatchResult, EditorError> {
        let mut result = self.dispatch(Action::Layout(LayoutMutation::UpdateComponent {
            uuid: uuid.to_string(),
            model: model.clone(),
        }))?;
        if !result.changed {
            return Ok(result);
        }

        let current = self.layout.present().to_root();
        match self.preview.patch_component(uuid, &model, &current) {
            Ok(confirmed) => self.reconcile(confirmed),
            Err(err) => {
                warn!(uuid, error = %err, "Component patch rejected, keeping local edit");
                result.preview_error = Some(err);
            }
        }
        Ok(result)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layout_model(&self) -> &LayoutModelState {
        self.layout.present()
    }

    pub fn page_data(&self) -> &PageData {
        self.page_data.present()
    }

    pub fn layout_history(&self) -> &History<LayoutModelState> {
        &self.layout
    }

    pub fn page_data_history(&self) -> &History<PageData> {
        &self.page_data
    }

    pub fn coordinator(&self) -> &UndoRedoCoordinator {
        &self.coordinator
    }

    pub fn preview(&self) -> &PreviewPipeline {
        &self.preview
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn can_undo(&self) -> bool {
        self.coordinator.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.coordinator.can_redo()
    }

    pub fn latest_action_id(&self) -> Option<&str> {
        self.coordinator.latest_action_id()
    }

    /// Draw a fresh id from the session's generator
    pub fn new_id(&mut self) -> String {
        self.ids.new_id()
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("undo_stack", &self.coordinator.undo_stack())
            .field("redo_stack", &self.coordinator.redo_stack())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xb_layout::{ComponentNode, LayoutModelPiece};

    fn session() -> EditSession {
        let config = EditorConfig {
            deterministic_ids: true,
            ..EditorConfig::default()
        };
        EditSession::new("test", &config)
    }

    fn insert(uuid: &str) -> Action {
        Action::Layout(LayoutMutation::InsertNodes {
            to: vec![0, 0],
            piece: LayoutModelPiece::single(ComponentNode::new(uuid, "sdc.text"), Default::default()),
            forced_uuid: None,
        })
    }

    fn set_title(title: &str) -> Action {
        Action::PageData(PageDataAction::SetField {
            name: "title".to_string(),
            value: json!(title),
        })
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = session();
        assert!(session.layout_model().is_empty());
        assert!(!session.layout_model().initialized);
        assert!(!session.can_undo());
        assert!(!session.can_redo());
        assert_eq!(session.default_region(), "content");
    }

    #[test]
    fn test_insert_records_and_returns_uuid() {
        let mut session = session();
        let result = session.dispatch(insert("tmp")).unwrap();

        assert!(result.changed);
        assert_eq!(result.intent, Some(HistoryIntent::Record(SliceTag::LayoutModel)));
        assert_eq!(result.selected(), Some("xb-1"));
        assert!(session.layout_model().model.contains_key("xb-1"));
        assert_eq!(session.coordinator().undo_stack(), &[SliceTag::LayoutModel]);
    }

    #[test]
    fn test_hydration_is_not_undoable() {
        let mut session = session();
        let root = RootLayoutModel {
            layout: vec![xb_layout::RegionNode::new("content", "Content")
                .with_component(ComponentNode::new("a", "sdc.text"))],
            model: [("a".to_string(), ComponentModel::default())].into_iter().collect(),
        };
        let mut page = PageData::new();
        page.insert("title".to_string(), json!("A"));

        session.hydrate(root.clone(), page).unwrap();

        assert_eq!(session.layout_model().to_root(), root);
        assert_eq!(session.page_data()["title"], "A");
        assert!(!session.can_undo());
        assert!(session.layout_history().past().is_empty());
        assert!(session.page_data_history().past().is_empty());
    }

    #[test]
    fn test_undo_redo_steps_only_tagged_slice() {
        let mut session = session();
        session.dispatch(set_title("A")).unwrap();
        session.dispatch(insert("tmp")).unwrap();

        let undo = session.dispatch(Action::Undo).unwrap();
        assert_eq!(undo.intent, Some(HistoryIntent::Undo(SliceTag::LayoutModel)));
        assert!(session.layout_model().is_empty());
        assert_eq!(session.page_data()["title"], "A");
        assert_eq!(session.latest_action_id(), Some("xb-2"));

        let redo = session.dispatch(Action::Redo).unwrap();
        assert_eq!(redo.intent, Some(HistoryIntent::Redo(SliceTag::LayoutModel)));
        assert!(session.layout_model().model.contains_key("xb-1"));
    }

    #[test]
    fn test_undo_with_empty_stack_is_ignored() {
        let mut session = session();
        let result = session.dispatch(Action::Undo).unwrap();
        assert_eq!(result, DispatchResult::default());
        assert_eq!(session.latest_action_id(), None);
    }

    #[test]
    fn test_history_limit_keeps_coordinator_in_sync() {
        let config = EditorConfig {
            history_limit: 2,
            deterministic_ids: true,
            ..EditorConfig::default()
        };
        let mut session = EditSession::new("limited", &config);
        for title in ["A", "B", "C", "D"] {
            session.dispatch(set_title(title)).unwrap();
        }

        assert_eq!(session.page_data_history().past().len(), 2);
        assert_eq!(session.coordinator().undo_stack().len(), 2);

        while session.dispatch(Action::Undo).unwrap().changed {}
        assert_eq!(session.page_data()["title"], "B");
    }

    #[test]
    fn test_action_json_shape() {
        let actions: Vec<Action> = serde_json::from_value(json!([
            { "kind": "layout", "action": { "type": "deleteNode", "uuid": "a" } },
            { "kind": "pageData", "action": { "type": "setField", "name": "title", "value": "B" } },
            { "kind": "undo" },
            { "kind": "redo" }
        ]))
        .unwrap();

        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0].name(), "deleteNode");
        assert_eq!(actions[1], set_title("B"));
        assert_eq!(actions[2], Action::Undo);
    }
}
