//! Error types for schema merging.

use thiserror::Error;

use crate::tree::{PathBuf, Value};

/// Structured error types for the merge strategies.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MergeError {
    /// Both sides set the same key to values that cannot be reconciled
    #[error("Cannot merge types at path {path}: {existing} overwrites {incoming}")]
    Conflict {
        path: PathBuf,
        existing: Box<Value>,
        incoming: Box<Value>,
    },

    /// A concatenated key holds something other than a list
    #[error("Cannot concatenate {found} at path {path}")]
    NotAList { path: PathBuf, found: &'static str },
}

impl MergeError {
    /// Check if this error is a merge conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeError::Conflict { .. })
    }

    /// Get the path at which the merge failed
    pub fn path(&self) -> &PathBuf {
        match self {
            MergeError::Conflict { path, .. } | MergeError::NotAList { path, .. } => path,
        }
    }
}

// Conversion from MergeError to the main Error type
impl From<MergeError> for crate::Error {
    fn from(err: MergeError) -> Self {
        crate::Error::Merge(err)
    }
}
