//! Schema resolution tests
//!
//! Covers refinement through `_type`, terminal schemas, parameterized list
//! references and the two views of parameter bindings.

use bigraph_schema::{Value, path};
use serde_json::json;

use crate::helpers::{base_registry, value};

fn access(registry: &bigraph_schema::TypeRegistry, json: serde_json::Value) -> Option<Value> {
    registry.access(&value(json)).unwrap()
}

#[test]
fn test_refinement_overrides_base_fields() {
    let registry = base_registry();
    let refined = access(&registry, json!({"_type": "int", "_default": 5})).unwrap();

    assert_eq!(refined.field("_default"), Some(&Value::Int(5)));
    assert_eq!(refined.field("_apply"), Some(&Value::from("accumulate")));
    assert_eq!(refined.field("_check"), Some(&Value::from("check_int")));
    assert_eq!(refined.field("_type"), Some(&Value::from("int")));
}

#[test]
fn test_refinement_cannot_change_type_parameters() {
    let registry = base_registry();
    let err = registry
        .access(&value(json!({"_type": "list", "_type_parameters": ["other"]})))
        .unwrap_err();
    assert!(err.is_malformed());

    // Restating the base's parameters is allowed
    assert!(access(&registry, json!({"_type": "list", "_type_parameters": ["element"]})).is_some());
}

#[test]
fn test_refinement_of_unknown_base_is_none() {
    let registry = base_registry();
    assert_eq!(access(&registry, json!({"_type": "ogre"})), None);
}

#[test]
fn test_description_marks_terminal_schema() {
    let registry = base_registry();
    let raw = json!({"_description": "opaque", "inner": "not-a-type"});
    assert_eq!(access(&registry, raw.clone()), Some(value(raw)));
}

#[test]
fn test_plain_map_resolves_every_branch() {
    let registry = base_registry();
    let resolved = access(&registry, json!({"mass": "float", "_ports": {"in": "int"}})).unwrap();

    assert_eq!(resolved.field("mass"), access(&registry, json!("float")).as_ref());
    // Reserved keys are carried without resolution
    assert_eq!(resolved.field("_ports"), Some(&value(json!({"in": "int"}))));

    assert_eq!(access(&registry, json!({"mass": "float", "charge": "coulomb"})), None);
}

#[test]
fn test_list_reference_binds_parameters() {
    let registry = base_registry();
    let int = access(&registry, json!("int")).unwrap();

    let list_of_int = access(&registry, json!(["list", ["int"]])).unwrap();
    assert_eq!(list_of_int.field("_element"), Some(&int));
    assert_eq!(
        bigraph_schema::tree::get_path(&list_of_int, path!("_bindings", "element")),
        Some(&int)
    );

    let bare = access(&registry, json!(["list"])).unwrap();
    assert_eq!(bare, access(&registry, json!("list")).unwrap());
}

#[test]
fn test_malformed_list_references() {
    let registry = base_registry();

    let err = registry.access(&value(json!(["list", "int"]))).unwrap_err();
    assert!(err.is_malformed());

    let err = registry.access(&value(json!(["int", ["float"]]))).unwrap_err();
    assert!(err.is_malformed());

    assert_eq!(access(&registry, json!(["list", ["ogre"]])), None);
}

#[test]
fn test_parameter_views_are_synchronized() {
    let registry = base_registry();
    let float = access(&registry, json!("float")).unwrap();
    let int = access(&registry, json!("int")).unwrap();

    // Binding through the aggregate map fills in the per-parameter key
    let via_bindings =
        access(&registry, json!({"_type": "list", "_bindings": {"element": "float"}})).unwrap();
    assert_eq!(via_bindings.field("_element"), Some(&float));

    // The per-parameter key wins when both are given
    let both = access(
        &registry,
        json!({"_type": "list", "_element": "int", "_bindings": {"element": "float"}}),
    )
    .unwrap();
    assert_eq!(both.field("_element"), Some(&int));
    assert_eq!(
        both.field("_bindings").and_then(|bindings| bindings.field("element")),
        Some(&int)
    );

    assert_eq!(access(&registry, json!({"_type": "list", "_element": "ogre"})), None);
}

#[test]
fn test_non_schema_values_do_not_resolve() {
    let registry = base_registry();
    assert_eq!(access(&registry, json!(3)), None);
    assert_eq!(access(&registry, json!(null)), None);
    assert_eq!(access(&registry, json!("")), None);
    assert_eq!(access(&registry, json!("{}")), None);
}

#[test]
fn test_validate_schema_reports_each_problem() {
    let registry = base_registry();
    let report = registry.validate_schema(&value(json!({
        "ok": "int",
        "typo": "integer",
        "nested": {"_type": "flaot"},
        "behavior": {"_check": "check_everything"},
        "literal": 7,
    })));

    assert_eq!(report.len(), 4, "{report:?}");
    assert!(report.get(&path!("typo")).is_some());
    assert!(report.get(&path!("nested", "_type")).is_some());
    assert!(report.get(&path!("behavior", "_check")).is_some());
    assert!(report.get(&path!("literal")).is_some());
    assert!(report.get(&path!("ok")).is_none());
}
