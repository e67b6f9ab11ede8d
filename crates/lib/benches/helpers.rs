//! Shared helpers for benchmarks

use bigraph_schema::{Map, TypeRegistry, Value};

/// Creates a registry seeded with the base types.
pub fn base_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_base_types()
        .expect("Failed to register base types");
    registry
}

/// Builds a flat map of `width` integer leaves, "key_N" -> N.
pub fn flat_state(width: usize) -> Value {
    Value::Map((0..width).map(|i| (format!("key_{i}"), i as i64)).collect())
}

/// Builds a chain of `depth` nested maps ending in the integer leaf `leaf`.
pub fn nested_state(depth: usize, leaf: i64) -> Value {
    (0..depth).fold(Value::Int(leaf), |inner, i| {
        Value::Map([(format!("level_{i}"), inner)].into_iter().collect())
    })
}

/// Registers a linear chain of `length` subtypes: type_0 <- type_1 <- ...
pub fn register_chain(registry: &mut TypeRegistry, length: usize) {
    registry
        .register(
            "type_0",
            serde_json::json!({"_default": 0, "value": "int"}),
            &[],
            false,
        )
        .expect("Failed to register chain root");
    for i in 1..length {
        let mut schema = Map::new();
        schema.insert("_super", format!("type_{}", i - 1));
        schema.insert(format!("field_{i}"), "float");
        registry
            .register(format!("type_{i}"), schema, &[], false)
            .expect("Failed to register chain link");
    }
}
