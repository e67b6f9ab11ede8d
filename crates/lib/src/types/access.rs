//! Schema resolution.
//!
//! [`TypeRegistry::access`] expands any schema reference into a concrete
//! schema. References take several shapes:
//!
//! - a type name such as `"int"`, looked up directly or handed to the
//!   expression parser
//! - a refinement `{"_type": "int", "_default": 5}`, merged onto the base
//! - a positional instantiation `["list", ["int"]]`
//! - a plain map of branches, each resolved in turn
//! - a terminal schema carrying `_description`, returned untouched
//!
//! Absence is not an error: an unresolvable reference yields `Ok(None)`. Only
//! malformed references fail.

use crate::{
    Result,
    constants::{BINDINGS, DESCRIPTION, TYPE, TYPE_PARAMETERS, is_nonoverridable, is_reserved, parameter_key},
    merge::deep_merge,
    tree::{Map, Value},
    types::{TypeError, TypeRegistry},
};

impl TypeRegistry {
    /// Resolve a schema reference into a concrete schema.
    ///
    /// # Returns
    /// The resolved schema, or `None` if any part of the reference is unknown
    ///
    /// # Errors
    /// - [`TypeError::NonOverridable`] if a refinement changes `_super` or
    ///   `_type_parameters`
    /// - [`TypeError::MalformedSchema`] if a list reference has the wrong
    ///   shape, or binds parameters of a type that declares none
    pub fn access(&self, schema: &Value) -> Result<Option<Value>> {
        match schema {
            Value::Text(name) => self.access_name(name),
            Value::Map(map) => self.access_map(map),
            Value::List(items) => self.access_list(items),
            _ => Ok(None),
        }
    }

    pub(crate) fn access_name(&self, name: &str) -> Result<Option<Value>> {
        if let Some(found) = self.types.access(name) {
            tracing::trace!(name = %name, "resolved type by name");
            return Ok(Some(found.clone()));
        }
        if name.is_empty() || name == "{}" {
            return Ok(None);
        }
        let Some(parser) = &self.parser else {
            return Ok(None);
        };

        match parser.parse(name) {
            Ok(Value::Text(unchanged)) if unchanged == name => Ok(None),
            Ok(parsed) => {
                tracing::trace!(expression = %name, parsed = %parsed, "resolving parsed expression");
                self.access(&parsed)
            }
            Err(err) => {
                tracing::warn!(expression = %name, error = %err, "type expression did not parse");
                Ok(None)
            }
        }
    }

    fn access_map(&self, schema: &Map) -> Result<Option<Value>> {
        if schema.contains_key(DESCRIPTION) {
            return Ok(Some(Value::Map(schema.clone())));
        }
        if let Some(base) = schema.get(TYPE) {
            return self.refine(base, schema);
        }

        let mut resolved = Map::new();
        for (key, branch) in schema {
            if is_reserved(key) {
                resolved.insert(key, branch.clone());
                continue;
            }
            match self.access(branch)? {
                Some(found) => {
                    resolved.insert(key, found);
                }
                None => {
                    tracing::trace!(branch = %key, "branch did not resolve");
                    return Ok(None);
                }
            }
        }
        Ok(Some(Value::Map(resolved)))
    }

    /// Merge the fields of `schema` onto the type named by its `_type`.
    fn refine(&self, base: &Value, schema: &Map) -> Result<Option<Value>> {
        let Some(found) = self.access(base)? else {
            return Ok(None);
        };
        let Value::Map(mut found) = found else {
            return Ok(None);
        };

        for (key, value) in schema {
            if is_nonoverridable(key) && found.get(key) != Some(value) {
                return Err(TypeError::NonOverridable { key: key.clone() }.into());
            }
        }

        deep_merge(&mut found, schema);
        if !self.sync_parameters(&mut found)? {
            return Ok(None);
        }
        Ok(Some(Value::Map(found)))
    }

    /// Make `_<p>` and `_bindings[p]` agree for every declared parameter `p`,
    /// resolving the bound schema. Returns false if a binding is unknown.
    fn sync_parameters(&self, schema: &mut Map) -> Result<bool> {
        let parameters = declared_parameters(schema);
        for parameter in parameters {
            let key = parameter_key(&parameter);
            let declared = schema.get(&key).cloned().or_else(|| {
                schema
                    .get(BINDINGS)
                    .and_then(|bindings| bindings.field(&parameter))
                    .cloned()
            });
            let Some(declared) = declared else {
                continue;
            };
            let Some(resolved) = self.access(&declared)? else {
                return Ok(false);
            };
            bind_parameter(schema, &parameter, resolved);
        }
        Ok(true)
    }

    /// Instantiate `[base]` or `[base, [bindings...]]`.
    fn access_list(&self, items: &[Value]) -> Result<Option<Value>> {
        let (base, bindings) = match items {
            [base] => (base, &[][..]),
            [base, Value::List(bindings)] => (base, bindings.as_slice()),
            _ => {
                return Err(TypeError::MalformedSchema {
                    key: Value::List(items.to_vec()).to_json_string(),
                    reason: "expected [type] or [type, [bindings...]]".to_string(),
                }
                .into());
            }
        };

        let Some(found) = self.access(base)? else {
            return Ok(None);
        };
        if bindings.is_empty() {
            return Ok(Some(found));
        }
        let Value::Map(mut found) = found else {
            return Ok(None);
        };

        if !found.contains_key(TYPE_PARAMETERS) {
            return Err(TypeError::MalformedSchema {
                key: base.to_json_string(),
                reason: "bindings given for a type without _type_parameters".to_string(),
            }
            .into());
        }

        let parameters = declared_parameters(&found);
        for (parameter, binding) in parameters.iter().zip(bindings) {
            let Some(resolved) = self.access(binding)? else {
                return Ok(None);
            };
            bind_parameter(&mut found, parameter, resolved);
        }
        Ok(Some(Value::Map(found)))
    }
}

/// The parameter names listed under `_type_parameters`.
fn declared_parameters(schema: &Map) -> Vec<String> {
    schema
        .get(TYPE_PARAMETERS)
        .and_then(Value::as_list)
        .map(|parameters| {
            parameters
                .iter()
                .filter_map(|parameter| parameter.as_text().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn bind_parameter(schema: &mut Map, parameter: &str, resolved: Value) {
    schema.insert(parameter_key(parameter), resolved.clone());
    let bindings = schema
        .entry(BINDINGS)
        .or_insert_with(|| Value::Map(Map::new()));
    if !bindings.is_map() {
        *bindings = Value::Map(Map::new());
    }
    if let Value::Map(bindings) = bindings {
        bindings.insert(parameter, resolved);
    }
}
