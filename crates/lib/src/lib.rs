//! bigraph-schema: an extensible type system for composable hierarchical state.
//! Types are declared as schemas, compose through supertype merging, carry
//! type parameters, and drive a recursive apply engine dispatched by type.
//!
//! ## Core Concepts
//!
//! * **Values (`tree::Value`)**: Tagged tree nodes. Schemas and states are both nested maps of values.
//! * **Paths (`tree::PathBuf`)**: Sequences of segments addressing nodes, where `..` steps to the parent.
//! * **Registries (`registry::Registry`)**: Name-to-item tables that refuse to silently replace entries.
//! * **Merging (`merge`)**: Conflict-detecting, unconditional, and authority-driven ways to combine schemas.
//! * **Type Registry (`types::TypeRegistry`)**: Normalizes and stores schemas, resolves schema references,
//!   and dispatches to the behaviors (`types::Behavior`) each type names.
//! * **Apply (`apply::apply_tree`)**: Applies an update tree to a state tree, governed by a leaf type.
//!
//! The registry is an explicit value: build one, register types during start-up,
//! then share it read-only.

pub mod apply;
pub mod constants;
pub mod merge;
pub mod registry;
pub mod tree;
pub mod types;

/// Re-export the tree node types for easier access.
pub use tree::{Map, PathBuf, Value};
/// Re-export the type registry and its behaviors.
pub use types::{Behavior, BehaviorKind, TypeRegistry, TypeRegistryConfig};

/// Result type used throughout the bigraph-schema library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the bigraph-schema library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured path errors from the tree module
    #[error(transparent)]
    Tree(tree::TreeError),

    /// Structured registration errors from the registry module
    #[error(transparent)]
    Registry(registry::RegistryError),

    /// Structured merge errors from the merge module
    #[error(transparent)]
    Merge(merge::MergeError),

    /// Structured type errors from the types module
    #[error(transparent)]
    Type(types::TypeError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Tree(_) => "tree",
            Error::Registry(_) => "registry",
            Error::Merge(_) => "merge",
            Error::Type(_) => "types",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a referenced type or behavior was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Type(type_err) => type_err.is_unresolved(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict between registered or merged values.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Registry(registry_err) => registry_err.is_conflict(),
            Error::Merge(merge_err) => merge_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error indicates a schema, path or update of the wrong shape.
    pub fn is_malformed(&self) -> bool {
        match self {
            Error::Type(type_err) => type_err.is_malformed(),
            Error::Tree(tree::TreeError::InvalidPath { .. }) => true,
            Error::Merge(merge::MergeError::NotAList { .. }) => true,
            _ => false,
        }
    }

    /// Check if this error is a behavior contract violation.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Error::Registry(registry_err) => registry_err.is_contract_violation(),
            _ => false,
        }
    }

    /// Check if this error is a serialization error.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
