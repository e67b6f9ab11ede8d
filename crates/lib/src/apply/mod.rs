//! Type-driven application of updates to state trees.
//!
//! [`apply_tree`] walks an update alongside the current state. Each entry of
//! a map update is either a structural directive (`_add`, `_remove`), a whole
//! value of the governing leaf type (applied through that type's apply
//! behavior), or a nested update to recurse into.
//!
//! ```
//! use bigraph_schema::{Value, apply::{Bindings, apply_tree}, types::TypeRegistry};
//! use serde_json::json;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_base_types().unwrap();
//!
//! let current = Value::from(json!({"x": 2, "nested": {"y": 1}}));
//! let update = Value::from(json!({"x": 5, "nested": {"y": 1, "z": 3}}));
//! let result = apply_tree(current, &update, &Bindings::leaf("int"), &registry).unwrap();
//! assert_eq!(result, Value::from(json!({"x": 7, "nested": {"y": 2, "z": 3}})));
//! ```

use crate::{
    Result,
    constants::{ADD, ANY, REMOVE},
    tree::{Map, PathBuf, Value, remove_path},
    types::{TypeError, TypeRegistry},
};

/// Context threaded through an apply recursion.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    /// Schema governing values that are not recursed into
    leaf: Value,
}

impl Bindings {
    /// Bindings governed by `schema`: a type name or any schema reference.
    pub fn leaf(schema: impl Into<Value>) -> Self {
        Self {
            leaf: schema.into(),
        }
    }

    /// The schema governing leaf values
    pub fn leaf_schema(&self) -> &Value {
        &self.leaf
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::leaf(ANY)
    }
}

/// Apply `update` to `current` under the leaf type named by `bindings`.
///
/// A map update is walked entry by entry:
/// - `_add` merges its map into `current` without type dispatch
/// - `_remove` deletes the path it names from `current`
/// - an entry that checks as the leaf type is applied atomically through the
///   leaf type's apply behavior, starting from the leaf default if the branch
///   is absent
/// - any other entry is applied recursively
///
/// Any other update is combined with `current` through the leaf type's apply
/// behavior, after synthesizing the leaf default if `current` is
/// [`Value::Null`].
///
/// # Errors
/// - [`TypeError::InvalidUpdate`] if a directive has the wrong shape, or a map
///   update meets a leaf value
/// - [`TypeError::UnresolvedTypeReference`] if the leaf type is unknown
/// - whatever the leaf type's behaviors fail with
pub fn apply_tree(
    current: Value,
    update: &Value,
    bindings: &Bindings,
    registry: &TypeRegistry,
) -> Result<Value> {
    let leaf = registry.resolve(bindings.leaf_schema())?;

    let Value::Map(update) = update else {
        let current = if current.is_null() {
            registry.default_resolved(&leaf)?
        } else {
            current
        };
        return registry.apply_resolved(&leaf, current, update);
    };

    let mut current = match current {
        Value::Null => Map::new(),
        Value::Map(map) => map,
        other => {
            return Err(TypeError::InvalidUpdate {
                reason: format!("cannot apply a map update to {}", other.type_name()),
            }
            .into());
        }
    };

    for (key, branch) in update {
        match key.as_str() {
            ADD => {
                let Value::Map(added) = branch else {
                    return Err(TypeError::InvalidUpdate {
                        reason: format!("{ADD} expects a map, not {}", branch.type_name()),
                    }
                    .into());
                };
                current.extend(added.iter().map(|(key, value)| (key.clone(), value.clone())));
            }
            REMOVE => {
                let path = PathBuf::try_from(branch).map_err(|err| TypeError::InvalidUpdate {
                    reason: format!("{REMOVE} expects a path: {err}"),
                })?;
                let mut tree = Value::Map(current);
                remove_path(&mut tree, path);
                current = tree.into_map().unwrap_or_default();
            }
            _ => {
                let existing = current.remove(key).unwrap_or_default();
                let applied = if registry.check_resolved(&leaf, branch)? {
                    let existing = if existing.is_null() {
                        registry.default_resolved(&leaf)?
                    } else {
                        existing
                    };
                    registry.apply_resolved(&leaf, existing, branch)?
                } else {
                    apply_tree(existing, branch, bindings, registry)?
                };
                current.insert(key, applied);
            }
        }
    }

    tracing::trace!(keys = update.len(), "applied map update");
    Ok(Value::Map(current))
}

/// The apply behavior of `any`: recurse when both sides are maps, otherwise
/// replace `current` with `update`.
pub fn apply_any(
    current: Value,
    update: &Value,
    _bindings: &Bindings,
    registry: &TypeRegistry,
) -> Result<Value> {
    if current.is_map() && update.is_map() {
        apply_tree(current, update, &Bindings::default(), registry)
    } else {
        Ok(update.clone())
    }
}
