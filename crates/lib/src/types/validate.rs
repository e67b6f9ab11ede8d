//! Non-fatal schema validation.

use std::collections::BTreeMap;

use crate::{
    constants::{TYPE, is_reserved, is_type_schema_key},
    tree::{Map, PathBuf, Value},
    types::{BehaviorKind, TypeRegistry},
};

/// Problems found in a schema, keyed by the path of the offending field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: BTreeMap<PathBuf, String>,
}

impl ValidationReport {
    /// Returns true if no problems were found
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// The problem reported at `path`, if any
    pub fn get(&self, path: &PathBuf) -> Option<&str> {
        self.issues.get(path).map(String::as_str)
    }

    /// All problems in path order
    pub fn issues(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.issues.iter().map(|(path, issue)| (path, issue.as_str()))
    }

    fn report(&mut self, path: PathBuf, issue: String) {
        self.issues.insert(path, issue);
    }
}

impl TypeRegistry {
    /// Walk `schema` and report what registering or resolving it would trip
    /// over: unknown `_type` names, behavior names missing from their
    /// sub-registry, and branches that are neither schemas nor resolvable type
    /// names. Never fails.
    pub fn validate_schema(&self, schema: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        match schema {
            Value::Map(map) => self.validate_map(map, &PathBuf::new(), &mut report),
            other => report.report(
                PathBuf::new(),
                format!("schema is not a map: {}", other.to_json_string()),
            ),
        }
        report
    }

    fn validate_map(&self, schema: &Map, at: &PathBuf, report: &mut ValidationReport) {
        for (key, value) in schema {
            let path = at.clone().push(key);

            if key == TYPE {
                if !matches!(self.access(value), Ok(Some(_))) {
                    report.report(path, format!("type {value} is not in the registry"));
                }
            } else if let Some(kind) = BehaviorKind::from_field(key) {
                match value {
                    Value::Text(name) if self.behavior(kind, name).is_none() => {
                        report.report(path, format!("no entry in the {kind} registry for {name}"));
                    }
                    Value::Text(_) => {}
                    Value::Behavior(behavior) if behavior.kind() == kind => {}
                    other => {
                        report.report(path, format!("{other} is not a {kind} behavior"));
                    }
                }
            } else if is_type_schema_key(key) || is_reserved(key) {
                continue;
            } else {
                match value {
                    Value::Map(branch) => self.validate_map(branch, &path, report),
                    Value::Text(_) | Value::List(_) => {
                        if !matches!(self.access(value), Ok(Some(_))) {
                            report.report(path, format!("type {value} is not in the registry"));
                        }
                    }
                    other => {
                        report.report(path, format!("branch is not a schema: {other}"));
                    }
                }
            }
        }
    }
}
