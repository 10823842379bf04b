//! Error types for the editor

use thiserror::Error;
use xb_layout::LayoutError;

use crate::pipeline::PreviewError;

/// Failures that escape an editing operation.
///
/// Bad caller input (unknown uuid, malformed path) never ends up here: those
/// operations log and leave state unchanged. What does end up here is a
/// broken structural assumption, which callers should surface as an
/// unexpected error.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
