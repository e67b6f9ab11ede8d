//! Update application integration tests
//!
//! Covers leaf dispatch, recursion into nested updates, the `_add` and
//! `_remove` directives and the `any` fallback.

use bigraph_schema::{
    Value,
    apply::{Bindings, apply_any, apply_tree},
    types::TypeRegistry,
};
use serde_json::json;

use crate::helpers::{base_registry, shapes_registry, value};

#[test]
fn test_apply_int_leaves() {
    let registry = base_registry();
    let result = apply_tree(
        value(json!({"x": 2})),
        &value(json!({"x": 5})),
        &Bindings::leaf("int"),
        &registry,
    )
    .unwrap();
    assert_eq!(result, value(json!({"x": 7})));
}

#[test]
fn test_apply_deeply_nested() {
    let registry = base_registry();
    let current = value(json!({"cell": {"mass": 1.0, "volume": 2.0}}));
    let update = value(json!({"cell": {"mass": 0.5, "charge": -1.0}}));

    let result = apply_tree(current, &update, &Bindings::leaf("float"), &registry).unwrap();
    assert_eq!(
        result,
        value(json!({"cell": {"mass": 1.5, "volume": 2.0, "charge": -1.0}}))
    );
}

#[test]
fn test_apply_any_replaces_leaves() {
    let registry = TypeRegistry::new();
    let bindings = Bindings::default();

    assert_eq!(
        apply_any(Value::Int(5), &Value::Int(9), &bindings, &registry).unwrap(),
        Value::Int(9)
    );
    assert_eq!(
        apply_any(value(json!({"a": 1})), &Value::from("flat"), &bindings, &registry).unwrap(),
        Value::from("flat")
    );
}

#[test]
fn test_apply_under_any_merges_maps() {
    let registry = TypeRegistry::new();
    let result = apply_tree(
        value(json!({"x": {}, "keep": true})),
        &value(json!({"x": {"y": 1}})),
        &Bindings::default(),
        &registry,
    )
    .unwrap();
    assert_eq!(result, value(json!({"x": {"y": 1}, "keep": true})));
}

#[test]
fn test_apply_with_custom_type() {
    let registry = shapes_registry();

    // Absent branches start from the type's default
    let result = apply_tree(
        value(json!({"a": 10})),
        &value(json!({"a": 1, "b": 1})),
        &Bindings::leaf("square"),
        &registry,
    )
    .unwrap();
    assert_eq!(result, value(json!({"a": 11, "b": 2})));
}

#[test]
fn test_add_and_remove_directives() {
    let registry = base_registry();
    let current = value(json!({"pool": {"a": 1, "b": 2}}));
    let update = value(json!({
        "pool": {"_add": {"c": 3}, "_remove": "a", "b": 5}
    }));

    let result = apply_tree(current, &update, &Bindings::leaf("int"), &registry).unwrap();
    assert_eq!(result, value(json!({"pool": {"b": 7, "c": 3}})));

    let nested = apply_tree(
        value(json!({"a": {"b": {"c": 1}, "d": 2}})),
        &value(json!({"_remove": ["a", "b"]})),
        &Bindings::leaf("int"),
        &registry,
    )
    .unwrap();
    assert_eq!(nested, value(json!({"a": {"d": 2}})));
}

#[test]
fn test_invalid_updates() {
    let registry = base_registry();
    let int = Bindings::leaf("int");

    let err = apply_tree(Value::Int(1), &value(json!({"a": 1})), &int, &registry).unwrap_err();
    assert!(err.is_malformed());

    let err = apply_tree(Value::Null, &value(json!({"_add": 3})), &int, &registry).unwrap_err();
    assert!(err.is_malformed());

    let err = apply_tree(Value::Null, &value(json!({"_remove": 3})), &int, &registry).unwrap_err();
    assert!(err.is_malformed());

    let err = apply_tree(Value::Null, &Value::Int(1), &Bindings::leaf("ogre"), &registry)
        .unwrap_err();
    assert!(err.is_not_found());
}
