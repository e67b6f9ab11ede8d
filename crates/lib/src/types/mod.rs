//! The type registry.
//!
//! A [`TypeRegistry`] stores named schemas and the behaviors they dispatch to.
//! Registration normalizes a schema: supertypes are merged underneath it,
//! behavior fields are reduced to canonical names, and branch references are
//! resolved into concrete schemas. Everything downstream (access, dispatch,
//! apply) reads these normalized schemas.
//!
//! # Example
//!
//! ```
//! use bigraph_schema::{Value, types::{Behavior, TypeRegistry}};
//! use serde_json::json;
//!
//! let mut registry = TypeRegistry::new();
//! let sum = Behavior::apply("sum", |current, update, _bindings, _registry| {
//!     Ok(Value::from(current.as_int().unwrap_or(0) + update.as_int().unwrap_or(0)))
//! });
//!
//! let mut shape = Value::from(json!({"_default": 0})).into_map().unwrap();
//! shape.insert("_apply", sum);
//! registry.register("shape", shape, &[], false).unwrap();
//! registry.register("square", json!({"_super": "shape", "_default": 1}), &[], false).unwrap();
//!
//! let square = registry.access(&Value::from("square")).unwrap().unwrap();
//! assert_eq!(square.field("_default"), Some(&Value::Int(1)));
//! assert_eq!(square.field("_apply"), Some(&Value::from("sum")));
//! assert!(registry.is_descendant("square", "shape"));
//! ```

pub mod access;
pub mod behavior;
pub mod builtins;
pub mod collaborators;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod validate;

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

pub use behavior::{
    APPLY_CONTRACT, Applier, Behavior, BehaviorKind, Checker, DESERIALIZE_CONTRACT, Descriptor,
    Deserializer, Divider, Function, SERIALIZE_CONTRACT, SerializeFunction, Serializer,
};
pub use collaborators::{ExpressionParser, FunctionResolver};
pub use config::TypeRegistryConfig;
pub use errors::TypeError;
pub use validate::ValidationReport;

use crate::{
    Result,
    constants::{ANY, SUPER, TYPE, is_reserved},
    merge::type_merge,
    registry::{Registrable, Registry, RegistryError},
    tree::{Map, Value},
};

/// Registry of named schemas and the behaviors they dispatch to.
///
/// Every registry is seeded with the `any` type. Registries are independent
/// values; several can coexist, each describing its own universe of types.
#[derive(Clone)]
pub struct TypeRegistry {
    /// Normalized schemas by type name
    types: Registry<Value>,
    /// Declared immediate supertypes by type name
    supers: HashMap<String, Vec<String>>,
    apply_registry: Registry<Behavior>,
    check_registry: Registry<Behavior>,
    divide_registry: Registry<Behavior>,
    serialize_registry: Registry<Behavior>,
    deserialize_registry: Registry<Behavior>,
    parser: Option<Arc<dyn ExpressionParser>>,
    resolver: Option<Arc<dyn FunctionResolver>>,
    config: TypeRegistryConfig,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.list())
            .field("supers", &self.supers)
            .field("has_parser", &self.parser.is_some())
            .field("has_resolver", &self.resolver.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl TypeRegistry {
    /// Create a registry holding only the `any` type.
    pub fn new() -> Self {
        let mut registry = Self::empty(TypeRegistryConfig::default());
        registry.seed_any();
        registry
    }

    /// Create a registry from `config`.
    ///
    /// # Errors
    /// Fails only if seeding the base types fails.
    pub fn from_config(config: TypeRegistryConfig) -> Result<Self> {
        let mut registry = Self::empty(config);
        registry.seed_any();
        if registry.config.seed_base_types {
            registry.register_base_types()?;
        }
        Ok(registry)
    }

    fn empty(config: TypeRegistryConfig) -> Self {
        let with_contract = |kind: BehaviorKind| match kind.contract() {
            Some(contract) => Registry::with_contract(contract),
            None => Registry::new(),
        };

        Self {
            types: Registry::new(),
            supers: HashMap::new(),
            apply_registry: with_contract(BehaviorKind::Apply),
            check_registry: with_contract(BehaviorKind::Check),
            divide_registry: with_contract(BehaviorKind::Divide),
            serialize_registry: with_contract(BehaviorKind::Serialize),
            deserialize_registry: with_contract(BehaviorKind::Deserialize),
            parser: None,
            resolver: None,
            config,
        }
    }

    /// Attach the parser consulted for unregistered type names.
    pub fn with_parser(mut self, parser: impl ExpressionParser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Attach the resolver consulted for unregistered behavior names.
    pub fn with_resolver(mut self, resolver: impl FunctionResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn config(&self) -> &TypeRegistryConfig {
        &self.config
    }

    /// The sub-registry holding behaviors of `kind`
    pub fn behavior_registry(&self, kind: BehaviorKind) -> &Registry<Behavior> {
        match kind {
            BehaviorKind::Apply => &self.apply_registry,
            BehaviorKind::Check => &self.check_registry,
            BehaviorKind::Divide => &self.divide_registry,
            BehaviorKind::Serialize => &self.serialize_registry,
            BehaviorKind::Deserialize => &self.deserialize_registry,
        }
    }

    fn behavior_registry_mut(&mut self, kind: BehaviorKind) -> &mut Registry<Behavior> {
        match kind {
            BehaviorKind::Apply => &mut self.apply_registry,
            BehaviorKind::Check => &mut self.check_registry,
            BehaviorKind::Divide => &mut self.divide_registry,
            BehaviorKind::Serialize => &mut self.serialize_registry,
            BehaviorKind::Deserialize => &mut self.deserialize_registry,
        }
    }

    /// Look up a registered behavior by kind and name
    pub fn behavior(&self, kind: BehaviorKind, name: &str) -> Option<&Behavior> {
        self.behavior_registry(kind).access(name)
    }

    /// Register a behavior under `name` in the sub-registry of its kind.
    ///
    /// # Errors
    /// - `RegistryError::Conflict` if a different behavior holds `name` and
    ///   `force` is false
    /// - `RegistryError::SignatureContractViolation` if the behavior declares
    ///   parameters outside its kind's contract
    pub fn register_behavior(
        &mut self,
        name: impl Into<String>,
        behavior: Behavior,
        force: bool,
    ) -> Result<()> {
        let name = name.into();
        let kind = behavior.kind();
        self.behavior_registry_mut(kind)
            .register(name.as_str(), behavior, &[], force)?;
        tracing::debug!(kind = %kind, name = %name, "registered behavior");
        Ok(())
    }

    /// Register a type.
    ///
    /// `schema` is either a schema map or the name of a type to alias. The
    /// stored schema is a normalized copy: supertypes are merged underneath
    /// it, behavior fields hold canonical names, and branches hold resolved
    /// schemas. A failing call stores nothing.
    ///
    /// # Arguments
    /// * `key` - The name to register the type under
    /// * `schema` - The schema, or a type name
    /// * `alternate_keys` - Further names the type is reachable under
    /// * `force` - Replace existing entries instead of failing
    ///
    /// # Errors
    /// - [`TypeError::UnresolvedTypeReference`] if a supertype or branch is unknown
    /// - [`TypeError::UnresolvedFunctionReference`] if a behavior name is unknown
    /// - [`TypeError::MalformedSchema`] if the schema has the wrong shape
    /// - [`TypeError::SupertypeCycle`] if the type would become its own ancestor
    /// - `MergeError::Conflict` if the schema disagrees with a supertype
    /// - `RegistryError::Conflict` if `key` already holds a different schema
    pub fn register(
        &mut self,
        key: impl Into<String>,
        schema: impl Into<Value>,
        alternate_keys: &[&str],
        force: bool,
    ) -> Result<()> {
        let key = key.into();
        let schema = match schema.into() {
            Value::Text(name) => {
                self.access_name(&name)?
                    .ok_or_else(|| TypeError::UnresolvedTypeReference {
                        name,
                        context: format!("the alias '{key}'"),
                    })?
            }
            other => other,
        };
        let schema = match schema {
            Value::Map(schema) => schema,
            other => {
                return Err(TypeError::MalformedSchema {
                    key,
                    reason: format!("type definitions must be maps, not {}", other.type_name()),
                }
                .into());
            }
        };

        let supers = self.declared_supers(&key, &schema)?;
        let mut schema = self.merge_supers(schema, &supers)?;
        self.resolve_branches(&key, &mut schema)?;

        let mut staged = Vec::new();
        self.bind_behaviors(&key, &mut schema, force, &mut staged)?;

        let schema = Value::Map(schema);
        self.types.validate(&key, &schema, alternate_keys, force)?;
        for (name, behavior) in staged {
            self.behavior_registry_mut(behavior.kind())
                .register(name, behavior, &[], force)?;
        }
        self.types.register(key.as_str(), schema, alternate_keys, force)?;

        tracing::debug!(key = %key, supers = ?supers, "registered type");
        self.supers.insert(key, supers);
        Ok(())
    }

    /// Register several types in order, stopping at the first failure.
    ///
    /// Types registered before the failure stay registered.
    pub fn register_multiple<K, V>(
        &mut self,
        types: impl IntoIterator<Item = (K, V)>,
        force: bool,
    ) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, schema) in types {
            self.register(key, schema, &[], force)?;
        }
        Ok(())
    }

    /// Normalize `_super` to a list of registered type names.
    fn declared_supers(&self, key: &str, schema: &Map) -> Result<Vec<String>> {
        let declared = match schema.get(SUPER) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Text(name)) => vec![name.clone()],
            Some(Value::List(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Text(name) => Ok(name.clone()),
                    other => Err(TypeError::MalformedSchema {
                        key: key.to_string(),
                        reason: format!("supertypes must be type names, not {}", other.type_name()),
                    }),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(TypeError::MalformedSchema {
                    key: key.to_string(),
                    reason: format!("supertypes must be type names, not {}", other.type_name()),
                }
                .into());
            }
        };

        for supertype in &declared {
            if !self.types.contains(supertype) {
                return Err(TypeError::UnresolvedTypeReference {
                    name: supertype.clone(),
                    context: format!("the supertypes of '{key}'"),
                }
                .into());
            }
            if self.config.detect_supertype_cycles
                && (supertype == key || self.is_descendant(supertype, key))
            {
                return Err(TypeError::SupertypeCycle {
                    key: key.to_string(),
                    supertype: supertype.clone(),
                }
                .into());
            }
        }

        Ok(declared)
    }

    /// Fold each supertype's stored schema underneath `schema`, in order.
    fn merge_supers(&self, schema: Map, supers: &[String]) -> Result<Map> {
        let mut merged = schema;
        for supertype in supers {
            let mut base = self
                .types
                .access(supertype)
                .and_then(Value::as_map)
                .cloned()
                .unwrap_or_default();
            type_merge(&mut base, &merged, false)?;
            merged = base;
        }

        if !supers.is_empty() {
            merged.insert(SUPER, supers.to_vec());
        }
        Ok(merged)
    }

    /// Replace every branch of `schema` with its resolved schema.
    fn resolve_branches(&self, key: &str, schema: &mut Map) -> Result<()> {
        for (branch, declared) in schema.iter_mut() {
            if is_reserved(branch) {
                continue;
            }
            match self.access(declared)? {
                Some(resolved) => *declared = resolved,
                None => {
                    return Err(TypeError::UnresolvedTypeReference {
                        name: declared.to_json_string(),
                        context: format!("branch '{branch}' of '{key}'"),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Reduce every behavior field in `schema` and its branches to a
    /// canonical name, staging new behaviors in `staged`.
    fn bind_behaviors(
        &self,
        key: &str,
        schema: &mut Map,
        force: bool,
        staged: &mut Vec<(String, Behavior)>,
    ) -> Result<()> {
        for kind in BehaviorKind::ALL {
            let Some(field) = schema.get_mut(kind.field()) else {
                continue;
            };

            let name = match field {
                Value::Text(name) => {
                    if self.behavior(kind, name).is_none() && !is_staged(staged, kind, name) {
                        let found = self.resolve_function(key, kind, name)?;
                        self.stage(staged, name.clone(), found, force)?;
                    }
                    name.clone()
                }
                Value::Behavior(behavior) if behavior.kind() == kind => {
                    let name = behavior.name().to_string();
                    self.stage(staged, name.clone(), behavior.clone(), force)?;
                    name
                }
                other => {
                    return Err(TypeError::MalformedSchema {
                        key: key.to_string(),
                        reason: format!(
                            "{} must name a {kind} behavior, not {}",
                            kind.field(),
                            other.type_name()
                        ),
                    }
                    .into());
                }
            };
            *field = Value::Text(name);
        }

        for (branch, subschema) in schema.iter_mut() {
            if is_reserved(branch) {
                continue;
            }
            if let Value::Map(subschema) = subschema {
                self.bind_behaviors(key, subschema, force, staged)?;
            }
        }

        Ok(())
    }

    fn resolve_function(&self, key: &str, kind: BehaviorKind, name: &str) -> Result<Behavior> {
        let found = self
            .resolver
            .as_ref()
            .and_then(|resolver| resolver.resolve(kind, name));

        match found {
            Some(behavior) if behavior.kind() == kind => {
                tracing::debug!(kind = %kind, name = %name, "behavior found by resolver");
                Ok(behavior)
            }
            Some(behavior) => Err(TypeError::MalformedSchema {
                key: key.to_string(),
                reason: format!(
                    "resolver returned a {} behavior for {kind} name '{name}'",
                    behavior.kind()
                ),
            }
            .into()),
            None => Err(TypeError::UnresolvedFunctionReference {
                kind,
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Validate a behavior against its sub-registry and the other staged
    /// behaviors, then stage it.
    fn stage(
        &self,
        staged: &mut Vec<(String, Behavior)>,
        name: String,
        behavior: Behavior,
        force: bool,
    ) -> Result<()> {
        let kind = behavior.kind();
        self.behavior_registry(kind)
            .validate(&name, &behavior, &[], force)?;

        let duplicate = staged
            .iter()
            .find(|(staged_name, staged_behavior)| {
                staged_behavior.kind() == kind && *staged_name == name
            });
        match duplicate {
            Some((_, existing)) if *existing != behavior => {
                return Err(RegistryError::Conflict {
                    key: name,
                    existing: existing.label(),
                    incoming: behavior.label(),
                }
                .into());
            }
            Some(_) => {}
            None => staged.push((name, behavior)),
        }
        Ok(())
    }

    /// The stored schema for `key` and one of its fields.
    pub fn lookup(&self, key: &str, attribute: &str) -> Result<Option<Value>> {
        let found = self.access(&Value::from(key))?;
        Ok(found.and_then(|schema| schema.field(attribute).cloned()))
    }

    /// Returns true if `ancestor` is reachable from `key` through supertype
    /// edges.
    pub fn is_descendant(&self, key: &str, ancestor: &str) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            for supertype in self.supers(current) {
                if supertype == ancestor {
                    return true;
                }
                pending.push(supertype.as_str());
            }
        }
        false
    }

    /// The declared immediate supertypes of `key`
    pub fn supers(&self, key: &str) -> &[String] {
        self.supers.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `key` names a registered type
    pub fn contains(&self, key: &str) -> bool {
        self.types.contains(key)
    }

    /// The registered type names, sorted
    pub fn list(&self) -> Vec<String> {
        self.types.list()
    }

    /// Store the `any` type and its behaviors.
    fn seed_any(&mut self) {
        let mut schema = Map::new();
        schema.insert(TYPE, ANY);
        for behavior in builtins::any_behaviors() {
            let kind = behavior.kind();
            let name = behavior.name().to_string();
            schema.insert(kind.field(), name.as_str());
            self.behavior_registry_mut(kind).insert(name, behavior);
        }
        self.types.insert(ANY, Value::Map(schema));
        self.supers.insert(ANY.to_string(), Vec::new());
    }
}

fn is_staged(staged: &[(String, Behavior)], kind: BehaviorKind, name: &str) -> bool {
    staged
        .iter()
        .any(|(staged_name, behavior)| behavior.kind() == kind && staged_name == name)
}
