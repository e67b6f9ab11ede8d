//! Type-directed dispatch to behaviors.
//!
//! These are the operations consumers of a registry call with a schema and a
//! value: the schema is resolved, the behavior it names is looked up, and the
//! value is handed over. A schema that names no behavior of a kind falls back
//! to the behavior of `any`, except for division, which `any` does not define.

use crate::{
    Result,
    apply::Bindings,
    constants::{ANY, DEFAULT},
    tree::{Map, Value},
    types::{Behavior, BehaviorKind, TypeError, TypeRegistry},
};

impl TypeRegistry {
    /// Resolve `schema`, failing if it is unknown.
    pub fn resolve(&self, schema: &Value) -> Result<Value> {
        self.access(schema)?.ok_or_else(|| {
            TypeError::UnresolvedTypeReference {
                name: schema.to_json_string(),
                context: "a dispatch".to_string(),
            }
            .into()
        })
    }

    /// Returns true if `state` is a value of the type `schema`.
    pub fn check(&self, schema: &Value, state: &Value) -> Result<bool> {
        let resolved = self.resolve(schema)?;
        self.check_resolved(&resolved, state)
    }

    /// Apply `update` to `current` according to the type `schema`.
    pub fn apply(&self, schema: &Value, current: Value, update: &Value) -> Result<Value> {
        let resolved = self.resolve(schema)?;
        self.apply_resolved(&resolved, current, update)
    }

    /// The default value of the type `schema`.
    ///
    /// This is the schema's `_default` if it declares one, otherwise a map of
    /// the defaults of its branches, otherwise [`Value::Null`].
    pub fn default_value(&self, schema: &Value) -> Result<Value> {
        let resolved = self.resolve(schema)?;
        self.default_resolved(&resolved)
    }

    /// Serialize `value` according to the type `schema`.
    pub fn serialize(&self, schema: &Value, value: &Value) -> Result<Value> {
        let resolved = self.resolve(schema)?;
        let bindings = Bindings::leaf(resolved.clone());
        match self.behavior_for(&resolved, BehaviorKind::Serialize)? {
            Behavior::Serialize(serializer) => serializer.serialize(value, &bindings, self),
            other => Err(kind_mismatch(BehaviorKind::Serialize, &other)),
        }
    }

    /// Restore a value of the type `schema` from `serialized`.
    pub fn deserialize(&self, schema: &Value, serialized: &Value) -> Result<Value> {
        let resolved = self.resolve(schema)?;
        let bindings = Bindings::leaf(resolved.clone());
        match self.behavior_for(&resolved, BehaviorKind::Deserialize)? {
            Behavior::Deserialize(deserializer) => {
                deserializer.deserialize(serialized, &bindings, self)
            }
            other => Err(kind_mismatch(BehaviorKind::Deserialize, &other)),
        }
    }

    /// Split `value` between daughters according to the type `schema`.
    ///
    /// # Errors
    /// [`TypeError::MissingBehavior`] if the schema declares no `_divide`.
    pub fn divide(&self, schema: &Value, value: &Value) -> Result<Vec<Value>> {
        let resolved = self.resolve(schema)?;
        let bindings = Bindings::leaf(resolved.clone());
        match self.behavior_for(&resolved, BehaviorKind::Divide)? {
            Behavior::Divide(divider) => divider.divide(value, &bindings, self),
            other => Err(kind_mismatch(BehaviorKind::Divide, &other)),
        }
    }

    pub(crate) fn check_resolved(&self, resolved: &Value, state: &Value) -> Result<bool> {
        let bindings = Bindings::leaf(resolved.clone());
        match self.behavior_for(resolved, BehaviorKind::Check)? {
            Behavior::Check(checker) => Ok(checker.check(state, &bindings, self)),
            other => Err(kind_mismatch(BehaviorKind::Check, &other)),
        }
    }

    pub(crate) fn apply_resolved(
        &self,
        resolved: &Value,
        current: Value,
        update: &Value,
    ) -> Result<Value> {
        let bindings = Bindings::leaf(resolved.clone());
        match self.behavior_for(resolved, BehaviorKind::Apply)? {
            Behavior::Apply(applier) => applier.apply(current, update, &bindings, self),
            other => Err(kind_mismatch(BehaviorKind::Apply, &other)),
        }
    }

    pub(crate) fn default_resolved(&self, resolved: &Value) -> Result<Value> {
        let Some(schema) = resolved.as_map() else {
            return Ok(Value::Null);
        };
        if let Some(default) = schema.get(DEFAULT) {
            return Ok(default.clone());
        }

        let mut defaults = Map::new();
        for (key, branch) in schema.branches() {
            let default = self.default_resolved(branch)?;
            if !default.is_null() {
                defaults.insert(key, default);
            }
        }
        if defaults.is_empty() && schema.branches().next().is_none() {
            return Ok(Value::Null);
        }
        Ok(Value::Map(defaults))
    }

    /// The behavior of `kind` a resolved schema dispatches to.
    fn behavior_for(&self, resolved: &Value, kind: BehaviorKind) -> Result<Behavior> {
        let declared = match resolved.field(kind.field()) {
            Some(declared) => declared,
            None if kind == BehaviorKind::Divide => {
                return Err(TypeError::MissingBehavior {
                    kind,
                    schema: resolved.to_json_string(),
                }
                .into());
            }
            None => self
                .types
                .access(ANY)
                .and_then(|any| any.field(kind.field()))
                .ok_or_else(|| TypeError::MissingBehavior {
                    kind,
                    schema: resolved.to_json_string(),
                })?,
        };

        match declared {
            Value::Text(name) => self.behavior(kind, name).cloned().ok_or_else(|| {
                TypeError::UnresolvedFunctionReference {
                    kind,
                    name: name.clone(),
                }
                .into()
            }),
            Value::Behavior(behavior) if behavior.kind() == kind => Ok(behavior.clone()),
            other => Err(TypeError::MalformedSchema {
                key: resolved.to_json_string(),
                reason: format!(
                    "{} must name a {kind} behavior, not {}",
                    kind.field(),
                    other.type_name()
                ),
            }
            .into()),
        }
    }
}

fn kind_mismatch(expected: BehaviorKind, found: &Behavior) -> crate::Error {
    TypeError::MalformedSchema {
        key: found.name().to_string(),
        reason: format!("registered as {expected} but implements {}", found.kind()),
    }
    .into()
}
