//! Merge integration tests
//!
//! Covers the conflict rules of type_merge and the unconditional and
//! authority-driven strategies.

use bigraph_schema::{
    Value,
    merge::{deep_merge, type_merge, validate_merge},
    path,
};
use serde_json::json;

use crate::helpers::map;

#[test]
fn test_merge_disjoint_schemas_is_union() {
    let mut dest = map(json!({"x": "int", "_default": {"x": 0}}));
    let incoming = map(json!({"y": "float", "_ports": {"in": "int"}}));

    type_merge(&mut dest, &incoming, true).unwrap();
    assert_eq!(
        dest,
        map(json!({"x": "int", "y": "float", "_default": {"x": 0}, "_ports": {"in": "int"}}))
    );
}

#[test]
fn test_merge_conflicting_nonoverridable_key() {
    let mut dest = map(json!({"_type_parameters": ["a"]}));
    let err = type_merge(&mut dest, &map(json!({"_type_parameters": ["b"]})), true).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.path(), &path!("_type_parameters"));

    // Equal values merge cleanly
    type_merge(&mut dest, &map(json!({"_type_parameters": ["a"]})), true).unwrap();
    assert_eq!(dest, map(json!({"_type_parameters": ["a"]})));
}

#[test]
fn test_merge_overridable_keys_replace() {
    let mut dest = map(json!({"_default": 0, "_apply": "accumulate", "_description": "old"}));
    let incoming = map(json!({"_default": {"nested": true}, "_apply": "replace"}));

    type_merge(&mut dest, &incoming, true).unwrap();
    assert_eq!(
        dest,
        map(json!({"_default": {"nested": true}, "_apply": "replace", "_description": "old"}))
    );
}

#[test]
fn test_merge_branch_conflict_reports_both_values() {
    let mut dest = map(json!({"cell": {"volume": "float"}}));
    let err = type_merge(&mut dest, &map(json!({"cell": {"volume": "int"}})), true).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("cell/volume"), "{message}");
    assert!(message.contains("float") && message.contains("int"), "{message}");
}

#[test]
fn test_merge_super_must_be_list() {
    let mut dest = map(json!({"_super": "a"}));
    let err = type_merge(&mut dest, &map(json!({"_super": ["b"]})), true).unwrap_err();
    assert!(!err.is_conflict());
}

#[test]
fn test_deep_merge_never_fails() {
    let mut dest = map(json!({"a": {"b": 1}, "c": [1]}));
    deep_merge(&mut dest, &map(json!({"a": {"d": 2}, "c": "replaced"})));
    assert_eq!(dest, map(json!({"a": {"b": 1, "d": 2}, "c": "replaced"})));
}

#[test]
fn test_validate_merge_nested_authority() {
    let authority = map(json!({"cell": {"volume": 3.0}}));
    let mut dest = map(json!({"cell": {"volume": 1.0, "mass": 2}}));
    let incoming = map(json!({"cell": {"volume": 9.0, "mass": 2, "charge": -1}}));

    validate_merge(&authority, &mut dest, &incoming).unwrap();
    assert_eq!(
        dest.get("cell"),
        Some(&Value::from(json!({"volume": 3.0, "mass": 2, "charge": -1})))
    );
}
