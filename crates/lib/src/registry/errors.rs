//! Error types for registry operations.

use thiserror::Error;

/// Structured error types for [`Registry`](super::Registry) operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A different item is already registered under the key
    #[error("Registry already contains an entry for '{key}': {existing} --> {incoming}")]
    Conflict {
        key: String,
        existing: String,
        incoming: String,
    },

    /// A callable declares parameters outside the registry's contract
    #[error(
        "Function '{item}' parameters {parameters:?} are not all in the contract {contract:?}"
    )]
    SignatureContractViolation {
        item: String,
        parameters: Vec<String>,
        contract: Vec<String>,
    },
}

impl RegistryError {
    /// Check if this error is a registration conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, RegistryError::Conflict { .. })
    }

    /// Check if this error is a contract violation
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, RegistryError::SignatureContractViolation { .. })
    }

    /// Get the conflicting key if this is a conflict
    pub fn key(&self) -> Option<&str> {
        match self {
            RegistryError::Conflict { key, .. } => Some(key),
            RegistryError::SignatureContractViolation { .. } => None,
        }
    }
}

// Conversion from RegistryError to the main Error type
impl From<RegistryError> for crate::Error {
    fn from(err: RegistryError) -> Self {
        crate::Error::Registry(err)
    }
}
