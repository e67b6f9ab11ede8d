//! Tree path algebra integration tests
//!
//! Covers reading, establishing, writing and pruning nested state trees by path,
//! including relative navigation with `..`.

use bigraph_schema::{
    PathBuf, Value, path,
    tree::{
        establish_path, establish_path_from, get_path, remove_omitted, remove_path, set_path,
        transform_path,
    },
};
use serde_json::json;

use crate::helpers::value;

#[test]
fn test_path_round_trip() {
    let cases = [
        (path!("a"), Value::Int(1)),
        (path!("a", "b", "c"), Value::from("deep")),
        (path!("x", "y"), value(json!({"z": [1, 2]}))),
        (path!("flag"), Value::Bool(false)),
    ];

    for (path, expected) in cases {
        let mut tree = Value::Null;
        set_path(&mut tree, &path, expected.clone()).unwrap();
        assert_eq!(get_path(&tree, &path), Some(&expected), "at {path}");
    }
}

#[test]
fn test_get_path_missing_and_leaf() {
    let tree = value(json!({"a": {"b": 1}}));
    assert_eq!(get_path(&tree, path!()), Some(&tree));
    assert_eq!(get_path(&tree, path!("a", "missing")), None);
    assert_eq!(get_path(&tree, path!("a", "b", "c")), None);
}

#[test]
fn test_parent_traversal_at_root_fails() {
    let mut tree = Value::Null;
    let err = establish_path(&mut tree, path!("..")).unwrap_err();
    assert!(err.is_parent_traversal());

    let err = establish_path(&mut tree, path!("a", "..", "..")).unwrap_err();
    assert!(err.is_parent_traversal());
}

#[test]
fn test_parent_traversal_reaches_parent() {
    let mut tree = Value::Null;
    establish_path(&mut tree, path!("a", "b")).unwrap();
    set_path(&mut tree, path!("a", "marker"), 1).unwrap();

    let parent = establish_path_from(&mut tree, &path!("a", "b"), path!("..")).unwrap();
    assert_eq!(parent.field("marker"), Some(&Value::Int(1)));
    assert!(parent.field("b").is_some());

    let sibling = establish_path_from(&mut tree, &path!("a", "b"), path!("..", "c")).unwrap();
    assert!(sibling.is_map());
    assert!(get_path(&tree, path!("a", "c")).is_some());
}

#[test]
fn test_establish_through_leaf_fails() {
    let mut tree = value(json!({"a": 5}));
    let err = establish_path(&mut tree, path!("a", "b")).unwrap_err();
    assert!(err.is_not_a_map());
    assert_eq!(err.path(), Some(&path!("a")));
}

#[test]
fn test_bare_string_is_one_segment() {
    let mut tree = Value::Null;
    set_path(&mut tree, "a.b", 1).unwrap();
    assert_eq!(get_path(&tree, PathBuf::from("a.b")), Some(&Value::Int(1)));
    assert_eq!(get_path(&tree, path!("a", "b")), None);
}

#[test]
fn test_set_null_is_noop_and_empty_path_replaces() {
    let mut tree = value(json!({"a": 1}));
    set_path(&mut tree, path!("a"), Value::Null).unwrap();
    assert_eq!(tree, value(json!({"a": 1})));

    set_path(&mut tree, path!(), 7).unwrap();
    assert_eq!(tree, Value::Int(7));
}

#[test]
fn test_transform_and_remove() {
    let mut tree = value(json!({"counter": {"n": 1}}));
    transform_path(&mut tree, path!("counter", "n"), |n| {
        Value::from(n.as_int().unwrap_or(0) * 10)
    })
    .unwrap();
    assert_eq!(get_path(&tree, path!("counter", "n")), Some(&Value::Int(10)));

    assert_eq!(remove_path(&mut tree, path!("counter", "n")), Some(Value::Int(10)));
    assert_eq!(tree, value(json!({"counter": {}})));
    assert_eq!(remove_path(&mut tree, path!()), None);
}

#[test]
fn test_remove_omitted_prunes_dropped_branches() {
    let before = value(json!({"a": {}, "b": {"c": {}, "d": {}}}));
    let after = value(json!({"b": {"c": {}}}));
    let mut tree = value(json!({"a": {"X": 1}, "b": {"c": {"Y": 4}, "d": {"Z": 9}}}));

    remove_omitted(&before, &after, &mut tree).unwrap();

    assert_eq!(get_path(&tree, path!("a")), None);
    assert_eq!(get_path(&tree, path!("b", "c", "Y")), Some(&Value::Int(4)));
    assert_eq!(get_path(&tree, path!("b", "d")), None);
}

#[test]
fn test_remove_omitted_keeps_reserved_keys() {
    let before = value(json!({"_ports": {}, "a": {}}));
    let after = value(json!({}));
    let mut tree = value(json!({"_ports": {"in": 1}, "a": 2}));

    remove_omitted(&before, &after, &mut tree).unwrap();
    assert_eq!(tree, value(json!({"_ports": {"in": 1}})));
}
