//! Error types for tree path operations.

use thiserror::Error;

use crate::tree::PathBuf;

/// Structured error types for path navigation and mutation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TreeError {
    /// A `..` segment would travel above the traversal root
    #[error("Trying to travel above the top of the tree: {path}")]
    ParentTraversal { path: PathBuf },

    /// A path runs through a node that is not a map
    #[error("Cannot navigate through {found} at {path}")]
    NotAMap { path: PathBuf, found: &'static str },

    /// A value could not be interpreted as a path
    #[error("Invalid path: {reason}")]
    InvalidPath { reason: String },
}

impl TreeError {
    /// Check if this error was caused by parent traversal above the root
    pub fn is_parent_traversal(&self) -> bool {
        matches!(self, TreeError::ParentTraversal { .. })
    }

    /// Check if this error was caused by navigating through a leaf
    pub fn is_not_a_map(&self) -> bool {
        matches!(self, TreeError::NotAMap { .. })
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            TreeError::ParentTraversal { path } | TreeError::NotAMap { path, .. } => Some(path),
            TreeError::InvalidPath { .. } => None,
        }
    }
}

// Conversion from TreeError to the main Error type
impl From<TreeError> for crate::Error {
    fn from(err: TreeError) -> Self {
        crate::Error::Tree(err)
    }
}
