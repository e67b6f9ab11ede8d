//! Error types for the type registry.

use thiserror::Error;

use crate::types::BehaviorKind;

/// Structured error types for type registration, resolution and dispatch.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TypeError {
    /// A branch, supertype or base names a type that is not registered
    #[error("Type '{name}' referenced by {context} is not in the registry")]
    UnresolvedTypeReference { name: String, context: String },

    /// A named behavior is neither registered nor found by the resolver
    #[error("No {kind} behavior named '{name}' could be found")]
    UnresolvedFunctionReference { kind: BehaviorKind, name: String },

    /// A schema does not have the shape the registry expects
    #[error("Malformed schema for '{key}': {reason}")]
    MalformedSchema { key: String, reason: String },

    /// A refinement tried to change a field that may not be overridden
    #[error("Trying to override a non-overridable key: {key}")]
    NonOverridable { key: String },

    /// Registering the type would make it its own ancestor
    #[error("Type '{key}' cannot descend from '{supertype}', which already descends from it")]
    SupertypeCycle { key: String, supertype: String },

    /// A dispatch needed a behavior the schema does not declare
    #[error("Schema {schema} declares no {kind} behavior")]
    MissingBehavior { kind: BehaviorKind, schema: String },

    /// A builtin behavior received a value of the wrong shape
    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An update cannot be applied to the current state
    #[error("Invalid update: {reason}")]
    InvalidUpdate { reason: String },
}

impl TypeError {
    /// Check if this error reports a missing type or behavior
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            TypeError::UnresolvedTypeReference { .. } | TypeError::UnresolvedFunctionReference { .. }
        )
    }

    /// Check if this error reports a badly shaped schema or update
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            TypeError::MalformedSchema { .. }
                | TypeError::NonOverridable { .. }
                | TypeError::InvalidUpdate { .. }
        )
    }

    /// Check if this error is a supertype cycle
    pub fn is_cycle(&self) -> bool {
        matches!(self, TypeError::SupertypeCycle { .. })
    }

    /// Check if this error is a value of the wrong shape
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, TypeError::TypeMismatch { .. })
    }
}

// Conversion from TypeError to the main Error type
impl From<TypeError> for crate::Error {
    fn from(err: TypeError) -> Self {
        crate::Error::Type(err)
    }
}
