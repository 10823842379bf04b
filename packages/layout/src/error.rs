use thiserror::Error;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Path {path:?} does not resolve to an existing node")]
    PathNotFound { path: Vec<usize> },

    #[error("Invalid path {path:?}: {message}")]
    InvalidPath { path: Vec<usize>, message: String },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Cannot move {0} into its own subtree")]
    MoveIntoSelf(String),

    #[error("Node is not a component: {0}")]
    NotAComponent(String),
}

impl LayoutError {
    pub fn path_not_found(path: &[usize]) -> Self {
        Self::PathNotFound {
            path: path.to_vec(),
        }
    }

    /// Bad caller input rather than a broken tree
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::PathNotFound { .. })
    }

    pub fn invalid_path(path: &[usize], message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}
