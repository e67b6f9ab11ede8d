//! Merge strategies for schema-shaped maps.
//!
//! Three strategies reconcile two maps under different conflict policies:
//!
//! - [`type_merge`] - Asymmetric and conflict-detecting; used to fold a new
//!   schema on top of inherited structure
//! - [`deep_merge`] - Unconditional; incoming values always win
//! - [`validate_merge`] - A third map is the authority; otherwise both sides
//!   must already agree
//!
//! All three mutate `dest` in place.

pub mod errors;

pub use errors::MergeError;

use crate::{
    constants::{CONCATENATE_SCHEMA_KEYS, MERGE_SCHEMA_KEYS, OVERRIDABLE_SCHEMA_KEYS},
    tree::{Map, PathBuf, Value},
};

/// Merge `incoming` into `dest` without losing data.
///
/// For each key of `incoming`:
/// - absent from `dest`, or overridable: the incoming value replaces it
/// - a structurally merged key, or both values are maps: recurse
/// - a concatenated key (`_super`): extend `dest`'s list, unless
///   `merge_supers` is false
/// - equal values: nothing to do
/// - anything else: [`MergeError::Conflict`]
///
/// ```
/// # use bigraph_schema::{Value, merge::type_merge};
/// # use serde_json::json;
/// let mut dest = Value::from(json!({"_default": 0, "x": "int"})).into_map().unwrap();
/// let incoming = Value::from(json!({"_default": 1, "y": "float"})).into_map().unwrap();
/// type_merge(&mut dest, &incoming, true).unwrap();
/// assert_eq!(dest.get("_default"), Some(&Value::Int(1)));
/// assert_eq!(dest.len(), 3);
///
/// let clash = Value::from(json!({"x": "string"})).into_map().unwrap();
/// assert!(type_merge(&mut dest, &clash, true).is_err());
/// ```
pub fn type_merge(dest: &mut Map, incoming: &Map, merge_supers: bool) -> Result<(), MergeError> {
    type_merge_at(dest, incoming, merge_supers, &PathBuf::new())
}

fn type_merge_at(
    dest: &mut Map,
    incoming: &Map,
    merge_supers: bool,
    at: &PathBuf,
) -> Result<(), MergeError> {
    for (key, value) in incoming {
        let path = at.clone().push(key);
        let Some(existing) = dest.get_mut(key) else {
            dest.insert(key, value.clone());
            continue;
        };

        if OVERRIDABLE_SCHEMA_KEYS.contains(&key.as_str()) {
            *existing = value.clone();
            continue;
        }

        match (existing, value) {
            (Value::Map(existing), Value::Map(value)) => {
                type_merge_at(existing, value, merge_supers, &path)?;
            }
            (existing, value) if CONCATENATE_SCHEMA_KEYS.contains(&key.as_str()) => {
                if !merge_supers {
                    continue;
                }
                match (existing, value) {
                    (Value::List(existing), Value::List(value)) => {
                        existing.extend(value.iter().cloned());
                    }
                    (Value::List(_), other) => {
                        return Err(MergeError::NotAList {
                            path,
                            found: other.type_name(),
                        });
                    }
                    (other, _) => {
                        return Err(MergeError::NotAList {
                            path,
                            found: other.type_name(),
                        });
                    }
                }
            }
            (existing, value) if *existing == *value => {}
            (existing, value) => {
                let structural = MERGE_SCHEMA_KEYS.contains(&key.as_str());
                tracing::trace!(path = %path, structural, "type merge conflict");
                return Err(MergeError::Conflict {
                    path,
                    existing: Box::new(existing.clone()),
                    incoming: Box::new(value.clone()),
                });
            }
        }
    }

    Ok(())
}

/// Recursively merge `incoming` into `dest`.
///
/// Map-valued keys present on both sides recurse; everything else is
/// overwritten. Never fails.
pub fn deep_merge(dest: &mut Map, incoming: &Map) {
    for (key, value) in incoming {
        match (dest.get_mut(key), value) {
            (Some(Value::Map(existing)), Value::Map(value)) => deep_merge(existing, value),
            _ => {
                dest.insert(key, value.clone());
            }
        }
    }
}

/// Recursively merge `incoming` into `dest`, deferring to `authority`.
///
/// Map-valued keys present on both sides recurse (into the matching branch of
/// `authority`, if any). Otherwise a value held by `authority` wins, a value
/// only in `incoming` is added, and a key present on both sides must already
/// hold equal values.
pub fn validate_merge(authority: &Map, dest: &mut Map, incoming: &Map) -> Result<(), MergeError> {
    validate_merge_at(authority, dest, incoming, &PathBuf::new())
}

fn validate_merge_at(
    authority: &Map,
    dest: &mut Map,
    incoming: &Map,
    at: &PathBuf,
) -> Result<(), MergeError> {
    let empty = Map::new();
    for (key, value) in incoming {
        let path = at.clone().push(key);
        if let (Some(Value::Map(existing)), Value::Map(value)) = (dest.get_mut(key), value) {
            let authority = authority.get(key).and_then(Value::as_map).unwrap_or(&empty);
            validate_merge_at(authority, existing, value, &path)?;
            continue;
        }

        if let Some(decided) = authority.get(key) {
            dest.insert(key, decided.clone());
            continue;
        }

        match dest.get(key) {
            Some(existing) if existing != value => {
                return Err(MergeError::Conflict {
                    path,
                    existing: Box::new(existing.clone()),
                    incoming: Box::new(value.clone()),
                });
            }
            Some(_) => {}
            None => {
                dest.insert(key, value.clone());
            }
        }
    }

    Ok(())
}
