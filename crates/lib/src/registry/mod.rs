//! Generic name-to-item registry.
//!
//! A [`Registry`] associates items with string keys, refusing to silently
//! replace a registered item with a different one. Registries of callables may
//! enforce a parameter contract: every parameter a callable declares must be a
//! member of the contract.
//!
//! # Example
//!
//! ```
//! use bigraph_schema::{Value, registry::Registry};
//!
//! let mut registry = Registry::new();
//! registry.register("answer", Value::from(42), &["the-answer"], false).unwrap();
//!
//! // Identical re-registration is a no-op
//! registry.register("answer", Value::from(42), &[], false).unwrap();
//!
//! // A differing value needs `force`
//! assert!(registry.register("answer", Value::from(7), &[], false).is_err());
//! registry.register("answer", Value::from(7), &[], true).unwrap();
//!
//! assert_eq!(registry.access("answer"), Some(&Value::from(7)));
//! assert_eq!(registry.access("the-answer"), Some(&Value::from(42)));
//! assert_eq!(registry.list(), vec!["answer".to_string()]);
//! ```

pub mod errors;

use std::collections::{BTreeSet, HashMap};

pub use errors::RegistryError;

use crate::Value;

/// Trait for items that can be stored in a [`Registry`].
///
/// Provides the identity comparison used to make re-registration idempotent,
/// and the declared parameter list checked against a registry's contract.
pub trait Registrable: Clone {
    /// Returns true if `other` is the same item as `self`.
    fn same_entry(&self, other: &Self) -> bool;

    /// Parameter names declared by a callable item, or `None` for plain data.
    fn parameters(&self) -> Option<&[&'static str]> {
        None
    }

    /// Human-readable rendering used in error messages.
    fn label(&self) -> String;
}

impl Registrable for Value {
    fn same_entry(&self, other: &Self) -> bool {
        self == other
    }

    fn label(&self) -> String {
        self.to_json_string()
    }
}

/// A collection of items indexed by key.
///
/// Each item is registered under one main key and any number of alternate
/// keys. Only main keys are enumerated by [`Registry::list`].
#[derive(Debug, Clone)]
pub struct Registry<T> {
    /// Items indexed by main and alternate keys
    entries: HashMap<String, T>,
    /// Keys items were registered under, excluding alternates
    main_keys: BTreeSet<String>,
    /// Parameter names callables are allowed to declare
    contract: Option<BTreeSet<&'static str>>,
}

impl<T: Registrable> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Registrable> Registry<T> {
    /// Create a new registry without a parameter contract
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            main_keys: BTreeSet::new(),
            contract: None,
        }
    }

    /// Create a new registry whose callables must only declare `parameters`
    pub fn with_contract(parameters: &[&'static str]) -> Self {
        Self {
            contract: Some(parameters.iter().copied().collect()),
            ..Self::new()
        }
    }

    /// The parameter contract, if this registry enforces one
    pub fn contract(&self) -> Option<Vec<&'static str>> {
        self.contract
            .as_ref()
            .map(|contract| contract.iter().copied().collect())
    }

    /// Check whether `item` could be registered without writing anything
    ///
    /// # Arguments
    /// * `key` - The main key
    /// * `item` - The item to register
    /// * `alternate_keys` - Additional keys the item would be reachable under
    /// * `force` - Whether existing entries would be overwritten
    ///
    /// # Returns
    /// The error [`Registry::register`] would fail with, if any
    pub fn validate(
        &self,
        key: &str,
        item: &T,
        alternate_keys: &[&str],
        force: bool,
    ) -> Result<(), RegistryError> {
        if let (Some(contract), Some(parameters)) = (&self.contract, item.parameters()) {
            if !parameters.iter().all(|p| contract.contains(p)) {
                return Err(RegistryError::SignatureContractViolation {
                    item: key.to_string(),
                    parameters: parameters.iter().map(|p| p.to_string()).collect(),
                    contract: contract.iter().map(|p| p.to_string()).collect(),
                });
            }
        }

        if force {
            return Ok(());
        }

        for registry_key in std::iter::once(key).chain(alternate_keys.iter().copied()) {
            match self.entries.get(registry_key) {
                Some(existing) if !existing.same_entry(item) => {
                    return Err(RegistryError::Conflict {
                        key: registry_key.to_string(),
                        existing: existing.label(),
                        incoming: item.label(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Add an item to the registry
    ///
    /// Every key is validated before any is written, so a failing call leaves
    /// the registry untouched.
    ///
    /// # Arguments
    /// * `key` - The main key, included in [`Registry::list`]
    /// * `item` - The item to register
    /// * `alternate_keys` - Additional keys to register the item under
    /// * `force` - Overwrite existing entries instead of failing
    ///
    /// # Returns
    /// `RegistryError::Conflict` if a key holds a different item and `force` is
    /// false, `RegistryError::SignatureContractViolation` if the item breaks the
    /// contract
    pub fn register(
        &mut self,
        key: impl Into<String>,
        item: T,
        alternate_keys: &[&str],
        force: bool,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        self.validate(&key, &item, alternate_keys, force)?;

        for alternate in alternate_keys {
            self.entries.insert(alternate.to_string(), item.clone());
        }
        self.entries.insert(key.clone(), item);
        self.main_keys.insert(key);

        Ok(())
    }

    /// Store an item without validation, for seeding known-good entries
    pub(crate) fn insert(&mut self, key: impl Into<String>, item: T) {
        let key = key.into();
        self.entries.insert(key.clone(), item);
        self.main_keys.insert(key);
    }

    /// Register several items under their main keys, stopping at the first failure
    pub fn register_multiple(
        &mut self,
        items: impl IntoIterator<Item = (String, T)>,
        force: bool,
    ) -> Result<(), RegistryError> {
        for (key, item) in items {
            self.register(key, item, &[], force)?;
        }
        Ok(())
    }

    /// Get an item by main or alternate key
    pub fn access(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Check if a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// List the main keys in sorted order
    pub fn list(&self) -> Vec<String> {
        self.main_keys.iter().cloned().collect()
    }

    /// Number of main keys
    pub fn len(&self) -> usize {
        self.main_keys.len()
    }

    /// Returns true if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.main_keys.is_empty()
    }
}
