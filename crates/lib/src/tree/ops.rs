//! Path algebra over nested trees.
//!
//! These functions address and mutate nested [`Value::Map`] trees by path.
//! Reads never fail: a missing segment yields `None`. Writes create
//! intermediate maps on demand and fail only when a path runs through a leaf or
//! travels above its root.

use crate::tree::{Map, PathBuf, TreeError, Value};

/// Follows `path` through nested maps and returns the node found there.
///
/// Returns `None` the instant a segment is absent or the current node is not a
/// map. The empty path returns `tree` itself.
///
/// ```
/// # use bigraph_schema::{Value, path, tree::get_path};
/// let tree = Value::from(serde_json::json!({"a": {"b": 1}}));
/// assert_eq!(get_path(&tree, path!("a", "b")), Some(&Value::Int(1)));
/// assert_eq!(get_path(&tree, path!("a", "c")), None);
/// ```
pub fn get_path(tree: &Value, path: impl Into<PathBuf>) -> Option<&Value> {
    let path = path.into();
    let mut node = tree;
    for segment in path.components() {
        node = node.as_map()?.get(segment)?;
    }
    Some(node)
}

/// Mutable counterpart of [`get_path`].
pub fn get_path_mut(tree: &mut Value, path: impl Into<PathBuf>) -> Option<&mut Value> {
    let path = path.into();
    let mut node = tree;
    for segment in path.components() {
        node = node.as_map_mut()?.get_mut(segment)?;
    }
    Some(node)
}

/// Walks `path` from the root of `tree`, creating empty maps for missing
/// segments, and returns the node now present at `path`.
///
/// # Errors
/// - [`TreeError::ParentTraversal`] if a `..` segment travels above the root.
/// - [`TreeError::NotAMap`] if the path runs through a leaf.
pub fn establish_path(
    tree: &mut Value,
    path: impl Into<PathBuf>,
) -> Result<&mut Value, TreeError> {
    establish_path_from(tree, &PathBuf::new(), path)
}

/// Like [`establish_path`], but `path` is interpreted relative to `cursor`, a
/// location inside `top`. Each `..` moves the cursor one level up.
pub fn establish_path_from<'a>(
    top: &'a mut Value,
    cursor: &PathBuf,
    path: impl Into<PathBuf>,
) -> Result<&'a mut Value, TreeError> {
    let resolved = path.into().resolve_from(cursor)?;

    let mut node = top;
    let mut walked = PathBuf::new();
    for segment in resolved.components() {
        if node.is_null() {
            *node = Value::Map(Map::new());
        }
        let map = match node {
            Value::Map(map) => map,
            other => {
                return Err(TreeError::NotAMap {
                    path: walked,
                    found: other.type_name(),
                });
            }
        };
        walked = walked.push(segment);
        node = map
            .entry(segment)
            .or_insert_with(|| Value::Map(Map::new()));
    }

    Ok(node)
}

/// Assigns `value` at `path`, establishing every segment but the last.
///
/// Assigning [`Value::Null`] is a no-op. The empty path replaces the whole tree.
pub fn set_path(
    tree: &mut Value,
    path: impl Into<PathBuf>,
    value: impl Into<Value>,
) -> Result<(), TreeError> {
    let value = value.into();
    if value.is_null() {
        return Ok(());
    }

    let path = path.into();
    let (Some(last), Some(towards)) = (path.last(), path.parent()) else {
        *tree = value;
        return Ok(());
    };

    let destination = establish_path(tree, &towards)?;
    if destination.is_null() {
        *destination = Value::Map(Map::new());
    }
    match destination {
        Value::Map(map) => {
            map.insert(last, value);
            Ok(())
        }
        other => Err(TreeError::NotAMap {
            path: towards,
            found: other.type_name(),
        }),
    }
}

/// Replaces the node at `path` with `transform` applied to it, establishing the
/// path first if it is absent.
pub fn transform_path<F>(
    tree: &mut Value,
    path: impl Into<PathBuf>,
    transform: F,
) -> Result<(), TreeError>
where
    F: FnOnce(Value) -> Value,
{
    let path = path.into();
    let before = establish_path(tree, &path)?.clone();
    let after = transform(before);
    set_path(tree, path, after)
}

/// Deletes the entry at the final segment of `path`, returning it.
///
/// The empty path is a no-op.
pub fn remove_path(tree: &mut Value, path: impl Into<PathBuf>) -> Option<Value> {
    let path = path.into();
    let last = path.last()?;
    let upon = get_path_mut(tree, path.parent()?)?;
    upon.as_map_mut()?.remove(last)
}

/// Removes from `tree` every branch present in `before` but absent from
/// `after`, recursing into branches present in both.
///
/// This drops concrete state when a schema's branch set shrinks. Reserved keys
/// in `before` are never pruned.
pub fn remove_omitted(before: &Value, after: &Value, tree: &mut Value) -> Result<(), TreeError> {
    prune(before, after, tree, &PathBuf::new())
}

fn prune(before: &Value, after: &Value, tree: &mut Value, at: &PathBuf) -> Result<(), TreeError> {
    let Some(before) = before.as_map() else {
        return Ok(());
    };

    match tree {
        Value::Map(_) => {}
        Value::Null => return Ok(()),
        other => {
            if before.branches().next().is_none() {
                return Ok(());
            }
            return Err(TreeError::NotAMap {
                path: at.clone(),
                found: other.type_name(),
            });
        }
    }

    let Some(after) = after.as_map() else {
        *tree = after.clone();
        return Ok(());
    };
    let Some(tree) = tree.as_map_mut() else {
        return Ok(());
    };

    for (key, down) in before.branches() {
        match after.get(key) {
            None => {
                tree.remove(key);
            }
            Some(after_down) => {
                if let Some(node) = tree.get_mut(key) {
                    prune(down, after_down, node, &at.clone().push(key))?;
                }
            }
        }
    }

    Ok(())
}
