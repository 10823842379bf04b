//! Copy and paste of component subtrees
//!
//! The clipboard holds the JSON of a `LayoutModelPiece` keyed by the
//! original uuids. Paste renumbers everything, so pasting the same payload
//! any number of times never collides.

use tracing::{debug, error};
use xb_layout::{
    collect_component_uuids, container_len, find_component, find_path_by_uuid, LayoutModelPiece,
    NodePath,
};

use crate::layout_model::LayoutModelState;
use crate::mutations::LayoutMutation;
use crate::session::{Action, EditSession};
use crate::EditorError;

/// Out-of-process holding area for copied content
pub trait Clipboard {
    fn write(&mut self, content: String);
    fn read(&self) -> Option<String>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    content: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&mut self, content: String) {
        self.content = Some(content);
    }

    fn read(&self) -> Option<String> {
        self.content.clone()
    }
}

/// Snapshot a component subtree with its model entries
pub fn copy_piece(state: &LayoutModelState, uuid: &str) -> Option<LayoutModelPiece> {
    let Some(component) = find_component(&state.layout, uuid) else {
        error!(uuid, "Cannot copy: no component with this uuid");
        return None;
    };

    let model = collect_component_uuids(component)
        .into_iter()
        .filter_map(|uuid| state.model.get(&uuid).cloned().map(|entry| (uuid, entry)))
        .collect();

    Some(LayoutModelPiece::single(component.clone(), model))
}

/// Copy the component with `uuid` to `clipboard`. False when there is no
/// such component.
pub fn copy(
    session: &EditSession,
    uuid: &str,
    clipboard: &mut dyn Clipboard,
) -> Result<bool, EditorError> {
    let Some(piece) = copy_piece(session.layout_model(), uuid) else {
        return Ok(false);
    };
    clipboard.write(serde_json::to_string(&piece)?);
    debug!(uuid, entries = piece.model.len(), "Copied component");
    Ok(true)
}

/// Where a paste lands: right after a selected component, at the end of a
/// selected slot or region, or at the end of the default region.
pub fn paste_path(state: &LayoutModelState, selected: Option<&str>, default_region: &str) -> Option<NodePath> {
    let Some(selected) = selected else {
        let region = state
            .layout
            .iter()
            .position(|region| region.id == default_region)
            .unwrap_or(0);
        let len = state.layout.get(region)?.components.len();
        return Some(vec![region, len]);
    };

    let mut path = find_path_by_uuid(&state.layout, selected)?;
    if path.len() % 2 == 0 {
        if let Some(last) = path.last_mut() {
            *last += 1;
        }
    } else {
        let len = container_len(&state.layout, &path)?;
        path.push(len);
    }
    Some(path)
}

/// Paste the clipboard content. Returns the uuid of the pasted node for the
/// caller to select.
pub fn paste(
    session: &mut EditSession,
    clipboard: &dyn Clipboard,
    selected: Option<&str>,
) -> Result<Option<String>, EditorError> {
    let Some(content) = clipboard.read() else {
        debug!("Clipboard is empty");
        return Ok(None);
    };
    let piece: LayoutModelPiece = match serde_json::from_str(&content) {
        Ok(piece) => piece,
        Err(err) => {
            error!(error = %err, "Clipboard does not hold layout content");
            return Ok(None);
        }
    };
    let Some(to) = paste_path(session.layout_model(), selected, session.default_region()) else {
        error!(selected = ?selected, "Cannot paste: selection not found");
        return Ok(None);
    };

    let forced_uuid = session.new_id();
    let result = session.dispatch(Action::Layout(LayoutMutation::InsertNodes {
        to,
        piece,
        forced_uuid: Some(forced_uuid),
    }))?;

    Ok(result.selected().map(str::to_string))
}
