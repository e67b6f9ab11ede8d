//! Constants used throughout the bigraph-schema library.
//!
//! This module provides central definitions for the reserved schema keys and
//! the key classes that drive merging and resolution. Every reserved key starts
//! with an underscore; any other key in a schema is a branch.

/// Prefix shared by every reserved schema key.
pub const RESERVED_PREFIX: char = '_';

/// Name of the universal bottom type seeded into every type registry.
pub const ANY: &str = "any";

/// Default value generated for a type.
pub const DEFAULT: &str = "_default";
/// Behavior field naming the type's apply function.
pub const APPLY: &str = "_apply";
/// Behavior field naming the type's check predicate.
pub const CHECK: &str = "_check";
/// Behavior field naming the type's serializer.
pub const SERIALIZE: &str = "_serialize";
/// Behavior field naming the type's deserializer.
pub const DESERIALIZE: &str = "_deserialize";
/// Behavior field naming the type's divider.
pub const DIVIDE: &str = "_divide";

/// Base type a schema refines.
pub const TYPE: &str = "_type";
/// Literal value carried by a schema.
pub const VALUE: &str = "_value";
/// Marks a schema as terminal; `access` returns it unchanged.
pub const DESCRIPTION: &str = "_description";
/// Declared type parameter names.
pub const TYPE_PARAMETERS: &str = "_type_parameters";
/// Immediate supertypes.
pub const SUPER: &str = "_super";

/// Aggregate mapping of type parameter name to bound type.
pub const BINDINGS: &str = "_bindings";
/// Named connection points of a process schema.
pub const PORTS: &str = "_ports";

/// Update directive merging entries into the current state.
pub const ADD: &str = "_add";
/// Update directive deleting a path from the current state.
pub const REMOVE: &str = "_remove";

/// Path segment that moves the cursor to its parent.
pub const PARENT: &str = "..";

/// Behavior fields every complete type declares.
pub const REQUIRED_SCHEMA_KEYS: &[&str] = &[DEFAULT, APPLY, CHECK, SERIALIZE, DESERIALIZE, DIVIDE];

/// Metadata fields a type may declare.
pub const OPTIONAL_SCHEMA_KEYS: &[&str] = &[TYPE, VALUE, DESCRIPTION, TYPE_PARAMETERS, SUPER];

/// Fields that hold a behavior name, in sub-registry order.
pub const FUNCTION_KEYS: &[&str] = &[APPLY, CHECK, DIVIDE, SERIALIZE, DESERIALIZE];

/// Fields a refinement or subtype may replace outright.
pub const OVERRIDABLE_SCHEMA_KEYS: &[&str] = &[
    TYPE,
    DEFAULT,
    APPLY,
    CHECK,
    SERIALIZE,
    DESERIALIZE,
    VALUE,
    DIVIDE,
    DESCRIPTION,
];

/// Fields merged structurally rather than replaced.
pub const MERGE_SCHEMA_KEYS: &[&str] = &[PORTS, TYPE_PARAMETERS];

/// Fields whose list values are concatenated on merge.
pub const CONCATENATE_SCHEMA_KEYS: &[&str] = &[SUPER];

/// Returns true if `key` is one of the required or optional schema fields.
pub fn is_type_schema_key(key: &str) -> bool {
    REQUIRED_SCHEMA_KEYS.contains(&key) || OPTIONAL_SCHEMA_KEYS.contains(&key)
}

/// Returns true if `key` is a type schema field that may not be overridden.
pub fn is_nonoverridable(key: &str) -> bool {
    is_type_schema_key(key) && !OVERRIDABLE_SCHEMA_KEYS.contains(&key)
}

/// Returns true if `key` lives in the reserved namespace.
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

/// Key holding the per-parameter binding for `parameter`.
pub fn parameter_key(parameter: &str) -> String {
    format!("{RESERVED_PREFIX}{parameter}")
}
