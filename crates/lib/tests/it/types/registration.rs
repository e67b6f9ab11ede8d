//! Type registration tests
//!
//! Covers supertype inheritance, idempotent re-registration, atomicity of
//! failed registrations, branch resolution and registry configuration.

use bigraph_schema::{
    BehaviorKind, Error, TypeRegistry, TypeRegistryConfig, Value,
    types::TypeError,
};
use serde_json::json;

use crate::helpers::{base_registry, map, shapes_registry, sum_behavior, value};

#[test]
fn test_inheritance_end_to_end() {
    let registry = shapes_registry();

    let square = registry.access(&Value::from("square")).unwrap().unwrap();
    assert_eq!(square.field("_default"), Some(&Value::Int(1)));
    assert_eq!(square.field("_apply"), Some(&Value::from("sum")));
    assert_eq!(square.field("_super"), Some(&value(json!(["shape"]))));
    assert_eq!(registry.lookup("square", "_default").unwrap(), Some(Value::Int(1)));

    // The inherited behavior is the registered summing function
    let applied = registry
        .apply(&Value::from("square"), Value::Int(2), &Value::Int(3))
        .unwrap();
    assert_eq!(applied, Value::Int(5));
}

#[test]
fn test_supertype_transitivity() {
    let mut registry = TypeRegistry::new();
    registry.register("A", json!({"a": "any"}), &[], false).unwrap();
    registry.register("B", json!({"_super": "A", "b": "any"}), &[], false).unwrap();
    registry.register("C", json!({"_super": ["B"], "c": "any"}), &[], false).unwrap();

    assert!(registry.is_descendant("C", "A"));
    assert!(registry.is_descendant("C", "B"));
    assert!(!registry.is_descendant("A", "C"));
    assert!(!registry.is_descendant("C", "C"));
    assert_eq!(registry.supers("C"), ["B".to_string()]);

    // Branches accumulate down the chain
    let c = registry.access(&Value::from("C")).unwrap().unwrap();
    for branch in ["a", "b", "c"] {
        assert!(c.field(branch).is_some(), "missing branch {branch}");
    }
}

#[test]
fn test_multiple_supertypes_merge_in_order() {
    let mut registry = TypeRegistry::new();
    registry.register("left", json!({"x": "any", "_default": {"x": 1}}), &[], false).unwrap();
    registry.register("right", json!({"y": "any", "_default": {"y": 2}}), &[], false).unwrap();
    registry
        .register("both", json!({"_super": ["left", "right"]}), &[], false)
        .unwrap();

    let both = registry.access(&Value::from("both")).unwrap().unwrap();
    assert!(both.field("x").is_some());
    assert!(both.field("y").is_some());
    // Later supertypes are folded underneath earlier ones, so the first
    // supertype's overridable fields win
    assert_eq!(both.field("_default"), Some(&value(json!({"x": 1}))));
    assert_eq!(both.field("_super"), Some(&value(json!(["left", "right"]))));
}

#[test]
fn test_conflicting_supertypes_fail() {
    let mut registry = TypeRegistry::new();
    registry.register("p", json!({"_type_parameters": ["a"]}), &[], false).unwrap();
    registry.register("q", json!({"_type_parameters": ["b"]}), &[], false).unwrap();

    let err = registry
        .register("pq", json!({"_super": ["p", "q"]}), &[], false)
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(!registry.contains("pq"));
}

#[test]
fn test_reregister_type() {
    let mut registry = TypeRegistry::new();
    registry.register("A", json!({"_default": "a"}), &[], false).unwrap();
    registry.register("A", json!({"_default": "a"}), &[], false).unwrap();

    let err = registry
        .register("A", json!({"_default": "b"}), &[], false)
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(registry.lookup("A", "_default").unwrap(), Some(Value::from("a")));

    registry.register("A", json!({"_default": "b"}), &[], true).unwrap();
    assert_eq!(registry.lookup("A", "_default").unwrap(), Some(Value::from("b")));
}

#[test]
fn test_alternate_keys() {
    let mut registry = base_registry();
    registry
        .register("velocity", json!({"_type": "float"}), &["speed"], false)
        .unwrap();

    assert!(registry.contains("speed"));
    assert!(!registry.list().contains(&"speed".to_string()));
    assert_eq!(
        registry.access(&Value::from("speed")).unwrap(),
        registry.access(&Value::from("velocity")).unwrap()
    );
}

#[test]
fn test_alternate_key_conflict_is_atomic() {
    let mut registry = base_registry();
    let mut shape = map(json!({"_default": 0}));
    shape.insert("_apply", sum_behavior("tally"));

    // "int" is taken, so neither the type nor its behavior is stored
    let err = registry
        .register("counter", shape, &["int"], false)
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(!registry.contains("counter"));
    assert!(registry.behavior(BehaviorKind::Apply, "tally").is_none());
}

#[test]
fn test_branches_resolved_at_registration() {
    let mut registry = base_registry();
    registry
        .register("cell", json!({"volume": "float", "genes": ["list", ["string"]]}), &[], false)
        .unwrap();

    let cell = registry.access(&Value::from("cell")).unwrap().unwrap();
    let float = registry.access(&Value::from("float")).unwrap().unwrap();
    assert_eq!(cell.field("volume"), Some(&float));
    assert_eq!(
        cell.field("genes").and_then(|genes| genes.field("_element")),
        registry.access(&Value::from("string")).unwrap().as_ref()
    );

    let err = registry
        .register("broken", json!({"organelle": "mitochondrion"}), &[], false)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Type(TypeError::UnresolvedTypeReference { .. })
    ));
}

#[test]
fn test_unknown_supertype_fails() {
    let mut registry = TypeRegistry::new();
    let err = registry
        .register("orphan", json!({"_super": "parent"}), &[], false)
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "types");
}

#[test]
fn test_config_seeds_base_types() {
    let config: TypeRegistryConfig = serde_json::from_value(json!({"seed_base_types": true})).unwrap();
    let registry = TypeRegistry::from_config(config).unwrap();
    assert!(registry.contains("int"));
    assert!(registry.contains("list"));
    assert!(registry.config().detect_supertype_cycles);

    let plain = TypeRegistry::new();
    assert_eq!(plain.list(), vec!["any".to_string()]);
}

#[test]
fn test_registries_are_independent() {
    let mut first = TypeRegistry::new();
    let second = TypeRegistry::new();
    first.register("only_here", json!({}), &[], false).unwrap();

    assert!(first.contains("only_here"));
    assert!(!second.contains("only_here"));
}
