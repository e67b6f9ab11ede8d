//! Builtin behaviors and base types.
//!
//! The `any` behaviors are seeded into every registry. The base types (`int`,
//! `float`, `string`, `boolean`, `list`) are opt-in through
//! [`TypeRegistry::register_base_types`] or
//! [`TypeRegistryConfig::seed_base_types`](super::TypeRegistryConfig).

use crate::{
    Result, Value,
    apply::{Bindings, apply_any},
    constants::{DEFAULT, DESCRIPTION, TYPE_PARAMETERS, parameter_key},
    tree::Map,
    types::{Behavior, TypeError, TypeRegistry},
};

/// The behaviors of the `any` type.
pub(crate) fn any_behaviors() -> Vec<Behavior> {
    vec![
        Behavior::apply("apply_any", apply_any),
        Behavior::check("check_any", check_any),
        Behavior::serialize("serialize_any", serialize_any),
        Behavior::deserialize("deserialize_any", deserialize_any),
    ]
}

fn check_any(_state: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> bool {
    true
}

/// Text passes through; everything else renders as JSON text.
fn serialize_any(value: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> Result<Value> {
    match value {
        Value::Text(_) => Ok(value.clone()),
        other => Ok(Value::Text(other.to_json_string())),
    }
}

fn deserialize_any(
    serialized: &Value,
    _bindings: &Bindings,
    _registry: &TypeRegistry,
) -> Result<Value> {
    Ok(serialized.clone())
}

/// Numeric sum. Integers stay integers; mixing in a float widens.
fn accumulate(
    current: Value,
    update: &Value,
    _bindings: &Bindings,
    _registry: &TypeRegistry,
) -> Result<Value> {
    match (&current, update) {
        (Value::Null, _) => Ok(update.clone()),
        (Value::Int(a), Value::Int(b)) => a.checked_add(*b).map(Value::Int).ok_or_else(|| {
            TypeError::InvalidUpdate {
                reason: format!("{a} + {b} overflows"),
            }
            .into()
        }),
        _ => match (current.as_float(), update.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Float(a + b)),
            (None, _) => Err(TypeError::TypeMismatch {
                expected: "number",
                found: current.type_name(),
            }
            .into()),
            (_, None) => Err(TypeError::TypeMismatch {
                expected: "number",
                found: update.type_name(),
            }
            .into()),
        },
    }
}

fn replace(
    _current: Value,
    update: &Value,
    _bindings: &Bindings,
    _registry: &TypeRegistry,
) -> Result<Value> {
    Ok(update.clone())
}

fn concatenate(
    current: Value,
    update: &Value,
    _bindings: &Bindings,
    _registry: &TypeRegistry,
) -> Result<Value> {
    match (current, update) {
        (Value::Null, Value::List(_)) => Ok(update.clone()),
        (Value::List(mut items), Value::List(more)) => {
            items.extend(more.iter().cloned());
            Ok(Value::List(items))
        }
        (Value::List(_), other) => Err(TypeError::TypeMismatch {
            expected: "list",
            found: other.type_name(),
        }
        .into()),
        (other, _) => Err(TypeError::TypeMismatch {
            expected: "list",
            found: other.type_name(),
        }
        .into()),
    }
}

fn check_int(state: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> bool {
    matches!(state, Value::Int(_))
}

fn check_float(state: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> bool {
    matches!(state, Value::Float(_))
}

fn check_string(state: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> bool {
    matches!(state, Value::Text(_))
}

fn check_boolean(state: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> bool {
    matches!(state, Value::Bool(_))
}

/// A list whose items, if the list type binds `element`, all check as that type.
fn check_list(state: &Value, bindings: &Bindings, registry: &TypeRegistry) -> bool {
    let Value::List(items) = state else {
        return false;
    };
    match bindings.leaf_schema().field(&parameter_key("element")) {
        Some(element) => items
            .iter()
            .all(|item| registry.check_resolved(element, item).unwrap_or(false)),
        None => true,
    }
}

fn serialize_json(value: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> Result<Value> {
    Ok(Value::Text(serde_json::to_string(value)?))
}

fn deserialize_json(
    serialized: &Value,
    _bindings: &Bindings,
    _registry: &TypeRegistry,
) -> Result<Value> {
    match serialized {
        Value::Text(text) => Ok(serde_json::from_str(text)?),
        other => Ok(other.clone()),
    }
}

fn divide_int(value: &Value, _bindings: &Bindings, _registry: &TypeRegistry) -> Result<Vec<Value>> {
    match value {
        Value::Int(n) => Ok(vec![Value::Int(n / 2), Value::Int(n - n / 2)]),
        other => Err(TypeError::TypeMismatch {
            expected: "int",
            found: other.type_name(),
        }
        .into()),
    }
}

fn divide_float(
    value: &Value,
    _bindings: &Bindings,
    _registry: &TypeRegistry,
) -> Result<Vec<Value>> {
    match value {
        Value::Float(x) => Ok(vec![Value::Float(x / 2.0), Value::Float(x / 2.0)]),
        other => Err(TypeError::TypeMismatch {
            expected: "float",
            found: other.type_name(),
        }
        .into()),
    }
}

fn base_type(description: &str, default: impl Into<Value>, behaviors: &[&Behavior]) -> Map {
    let mut schema = Map::new();
    schema.insert(DESCRIPTION, description);
    schema.insert(DEFAULT, default);
    for behavior in behaviors {
        schema.insert(behavior.kind().field(), (*behavior).clone());
    }
    schema
}

impl TypeRegistry {
    /// Register the base types `int`, `float`, `string`, `boolean` and `list`.
    ///
    /// Calling this again on the same registry is a no-op.
    pub fn register_base_types(&mut self) -> Result<()> {
        let accumulate = self.builtin(Behavior::apply("accumulate", accumulate));
        let replace = self.builtin(Behavior::apply("replace", replace));
        let concatenate = self.builtin(Behavior::apply("concatenate", concatenate));
        let serialize = self.builtin(Behavior::serialize("serialize_json", serialize_json));
        let deserialize = self.builtin(Behavior::deserialize("deserialize_json", deserialize_json));
        let check_int = self.builtin(Behavior::check("check_int", check_int));
        let check_float = self.builtin(Behavior::check("check_float", check_float));
        let check_string = self.builtin(Behavior::check("check_string", check_string));
        let check_boolean = self.builtin(Behavior::check("check_boolean", check_boolean));
        let check_list = self.builtin(Behavior::check("check_list", check_list));
        let divide_int = self.builtin(Behavior::divide("divide_int", divide_int));
        let divide_float = self.builtin(Behavior::divide("divide_float", divide_float));

        let mut list = base_type(
            "ordered sequence of elements",
            Value::List(Vec::new()),
            &[&concatenate, &check_list, &serialize, &deserialize],
        );
        list.insert(TYPE_PARAMETERS, vec!["element"]);

        self.register_multiple(
            [
                (
                    "int",
                    base_type(
                        "64-bit integer",
                        0,
                        &[&accumulate, &check_int, &divide_int, &serialize, &deserialize],
                    ),
                ),
                (
                    "float",
                    base_type(
                        "64-bit floating point number",
                        0.0,
                        &[&accumulate, &check_float, &divide_float, &serialize, &deserialize],
                    ),
                ),
                ("string", base_type("text string", "", &[&replace, &check_string])),
                (
                    "boolean",
                    base_type(
                        "true or false",
                        false,
                        &[&replace, &check_boolean, &serialize, &deserialize],
                    ),
                ),
                ("list", list),
            ],
            false,
        )
    }

    /// The already registered behavior with this behavior's kind and name, if
    /// any, so repeated seeding re-registers identical schemas.
    fn builtin(&self, behavior: Behavior) -> Behavior {
        self.behavior(behavior.kind(), behavior.name())
            .cloned()
            .unwrap_or(behavior)
    }
}
