//! Expression parser and function resolver tests

use bigraph_schema::{
    Behavior, BehaviorKind, Result, TypeRegistry, Value,
    types::{FunctionResolver, TypeError},
};
use serde_json::json;

use crate::helpers::{base_registry, sum_behavior, value};

/// Parses `name[arg, ...]` into `[name, [arg, ...]]`, leaving bare names
/// unchanged.
fn bracket_parser(expression: &str) -> Result<Value> {
    let Some(open) = expression.find('[') else {
        return Ok(Value::from(expression));
    };
    let Some(inner) = expression[open + 1..].strip_suffix(']') else {
        return Err(TypeError::MalformedSchema {
            key: expression.to_string(),
            reason: "unbalanced brackets".to_string(),
        }
        .into());
    };
    let arguments: Vec<Value> = inner.split(',').map(|arg| Value::from(arg.trim())).collect();
    Ok(Value::List(vec![
        Value::from(&expression[..open]),
        Value::List(arguments),
    ]))
}

fn parsing_registry() -> TypeRegistry {
    base_registry().with_parser(bracket_parser)
}

#[test]
fn test_parser_resolves_expressions() {
    let registry = parsing_registry();
    let int = registry.access(&Value::from("int")).unwrap().unwrap();

    let list = registry.access(&Value::from("list[int]")).unwrap().unwrap();
    assert_eq!(list.field("_element"), Some(&int));
    assert_eq!(
        list,
        registry.access(&value(json!(["list", ["int"]]))).unwrap().unwrap()
    );
}

#[test]
fn test_parser_closure() {
    let registry = base_registry().with_parser(|expression: &str| -> Result<Value> {
        match expression {
            "counter" => Ok(Value::from("int")),
            other => Ok(Value::from(other)),
        }
    });

    assert_eq!(
        registry.access(&Value::from("counter")).unwrap(),
        registry.access(&Value::from("int")).unwrap()
    );
    // Returned unchanged means the parser did not recognize it
    assert_eq!(registry.access(&Value::from("gauge")).unwrap(), None);
}

#[test]
fn test_parser_errors_mean_unresolved() {
    let registry = parsing_registry();
    assert_eq!(registry.access(&Value::from("list[int")).unwrap(), None);
    assert_eq!(registry.access(&Value::from("list[ogre]")).unwrap(), None);
}

#[test]
fn test_registered_branches_use_parser() {
    let mut registry = parsing_registry();
    registry
        .register("population", json!({"counts": "list[int]"}), &[], false)
        .unwrap();

    let population = registry.access(&Value::from("population")).unwrap().unwrap();
    assert!(
        population
            .field("counts")
            .and_then(|counts| counts.field("_element"))
            .is_some()
    );
    assert!(
        registry
            .check(&Value::from("list[int]"), &value(json!([1, 2])))
            .unwrap()
    );
}

fn physics_resolver(kind: BehaviorKind, name: &str) -> Option<Behavior> {
    match (kind, name) {
        (BehaviorKind::Apply, "physics.bounce") => Some(sum_behavior("physics.bounce")),
        (BehaviorKind::Check, "physics.bounce") => {
            Some(Behavior::check("physics.bounce", |_, _, _| true))
        }
        (_, "physics.misfiled") => Some(sum_behavior("physics.misfiled")),
        _ => None,
    }
}

#[test]
fn test_resolver_supplies_missing_behaviors() {
    let mut registry = TypeRegistry::new().with_resolver(physics_resolver);
    assert!(physics_resolver.resolve(BehaviorKind::Divide, "physics.bounce").is_none());

    registry
        .register(
            "ball",
            json!({"_default": 0, "_apply": "physics.bounce", "_check": "physics.bounce"}),
            &[],
            false,
        )
        .unwrap();

    // Resolved behaviors land in their sub-registries under the requested name
    assert!(registry.behavior(BehaviorKind::Apply, "physics.bounce").is_some());
    assert!(registry.behavior(BehaviorKind::Check, "physics.bounce").is_some());
    assert_eq!(
        registry
            .apply(&Value::from("ball"), Value::Int(1), &Value::Int(2))
            .unwrap(),
        Value::Int(3)
    );
}

#[test]
fn test_resolver_failures() {
    let mut registry = TypeRegistry::new().with_resolver(physics_resolver);

    let err = registry
        .register("ghost", json!({"_apply": "physics.teleport"}), &[], false)
        .unwrap_err();
    assert!(err.is_not_found());

    // A resolved behavior of the wrong kind is rejected
    let err = registry
        .register("misfiled", json!({"_check": "physics.misfiled"}), &[], false)
        .unwrap_err();
    assert!(err.is_malformed());
    assert!(!registry.contains("misfiled"));
}
