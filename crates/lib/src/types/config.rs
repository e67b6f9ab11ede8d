//! Construction options for a [`TypeRegistry`](super::TypeRegistry).

use serde::{Deserialize, Serialize};

/// Options controlling how a type registry is built and how strictly it
/// validates registrations.
///
/// Missing fields take their defaults when deserialized:
///
/// ```
/// # use bigraph_schema::types::TypeRegistryConfig;
/// let config: TypeRegistryConfig = serde_json::from_str(r#"{"seed_base_types": true}"#).unwrap();
/// assert!(config.seed_base_types);
/// assert!(config.detect_supertype_cycles);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRegistryConfig {
    /// Reject a registration whose supertypes already descend from it
    pub detect_supertype_cycles: bool,
    /// Register `int`, `float`, `string`, `boolean` and `list` on construction
    pub seed_base_types: bool,
}

impl Default for TypeRegistryConfig {
    fn default() -> Self {
        Self {
            detect_supertype_cycles: true,
            seed_base_types: false,
        }
    }
}
