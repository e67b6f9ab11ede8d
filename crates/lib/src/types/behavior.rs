//! Behavior implementations attached to types.
//!
//! Every type names up to five behaviors, one per [`BehaviorKind`]. Each kind
//! has its own trait, and every implementation carries a [`Descriptor`]: the
//! canonical name it is registered under and the parameters it declares. The
//! declared parameters are checked against the sub-registry's contract when the
//! behavior is registered, so a mismatch surfaces at registration time rather
//! than at call time.
//!
//! Closures can be wrapped directly:
//!
//! ```
//! use bigraph_schema::{Value, types::{Behavior, BehaviorKind}};
//!
//! let halve = Behavior::divide("halve", |value, _bindings, _registry| {
//!     let half = value.as_float().unwrap_or_default() / 2.0;
//!     Ok(vec![Value::from(half), Value::from(half)])
//! });
//! assert_eq!(halve.kind(), BehaviorKind::Divide);
//! assert_eq!(halve.name(), "halve");
//! ```

use std::{fmt, sync::Arc};

use crate::{
    Result, Value,
    apply::Bindings,
    constants::{APPLY, CHECK, DESERIALIZE, DIVIDE, SERIALIZE},
    registry::Registrable,
    types::TypeRegistry,
};

/// Parameters an apply behavior may declare.
pub const APPLY_CONTRACT: &[&str] = &["current", "update", "bindings", "registry"];
/// Parameters a serialize behavior may declare.
pub const SERIALIZE_CONTRACT: &[&str] = &["value", "bindings", "registry"];
/// Parameters a deserialize behavior may declare.
pub const DESERIALIZE_CONTRACT: &[&str] = &["serialized", "bindings", "registry"];

const CHECK_PARAMETERS: &[&str] = &["state", "bindings", "registry"];
const DIVIDE_PARAMETERS: &[&str] = &["value", "bindings", "registry"];

/// The behavior categories a type can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BehaviorKind {
    Apply,
    Check,
    Divide,
    Serialize,
    Deserialize,
}

impl BehaviorKind {
    /// Every kind, in the order schema fields are resolved during registration.
    pub const ALL: [BehaviorKind; 5] = [
        BehaviorKind::Apply,
        BehaviorKind::Check,
        BehaviorKind::Divide,
        BehaviorKind::Serialize,
        BehaviorKind::Deserialize,
    ];

    /// The schema field naming a behavior of this kind
    pub fn field(&self) -> &'static str {
        match self {
            BehaviorKind::Apply => APPLY,
            BehaviorKind::Check => CHECK,
            BehaviorKind::Divide => DIVIDE,
            BehaviorKind::Serialize => SERIALIZE,
            BehaviorKind::Deserialize => DESERIALIZE,
        }
    }

    /// The kind whose behavior `field` names, if any
    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field() == field)
    }

    /// The parameter contract enforced by this kind's sub-registry
    pub fn contract(&self) -> Option<&'static [&'static str]> {
        match self {
            BehaviorKind::Apply => Some(APPLY_CONTRACT),
            BehaviorKind::Serialize => Some(SERIALIZE_CONTRACT),
            BehaviorKind::Deserialize => Some(DESERIALIZE_CONTRACT),
            BehaviorKind::Check | BehaviorKind::Divide => None,
        }
    }

    /// The parameters declared by closures wrapped as this kind
    pub fn default_parameters(&self) -> &'static [&'static str] {
        match self {
            BehaviorKind::Apply => APPLY_CONTRACT,
            BehaviorKind::Check => CHECK_PARAMETERS,
            BehaviorKind::Divide => DIVIDE_PARAMETERS,
            BehaviorKind::Serialize => SERIALIZE_CONTRACT,
            BehaviorKind::Deserialize => DESERIALIZE_CONTRACT,
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BehaviorKind::Apply => "apply",
            BehaviorKind::Check => "check",
            BehaviorKind::Divide => "divide",
            BehaviorKind::Serialize => "serialize",
            BehaviorKind::Deserialize => "deserialize",
        };
        write!(f, "{name}")
    }
}

/// Canonical name and declared parameters of a behavior implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    parameters: Vec<&'static str>,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, parameters: &[&'static str]) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[&'static str] {
        &self.parameters
    }
}

/// Combines a current value with an update.
pub trait Applier: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    /// Returns the value that results from applying `update` to `current`
    fn apply(
        &self,
        current: Value,
        update: &Value,
        bindings: &Bindings,
        registry: &TypeRegistry,
    ) -> Result<Value>;
}

/// Decides whether a value belongs to a type.
pub trait Checker: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    fn check(&self, state: &Value, bindings: &Bindings, registry: &TypeRegistry) -> bool;
}

/// Converts a value into its serialized form.
pub trait Serializer: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    fn serialize(&self, value: &Value, bindings: &Bindings, registry: &TypeRegistry)
    -> Result<Value>;
}

/// Restores a value from its serialized form.
pub trait Deserializer: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    fn deserialize(
        &self,
        serialized: &Value,
        bindings: &Bindings,
        registry: &TypeRegistry,
    ) -> Result<Value>;
}

/// Splits a value between daughters.
pub trait Divider: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    fn divide(&self, value: &Value, bindings: &Bindings, registry: &TypeRegistry)
    -> Result<Vec<Value>>;
}

/// A behavior implementation of any kind.
///
/// Two behaviors are equal only if they are the same implementation instance,
/// so re-registering a clone is idempotent while registering a different
/// implementation under a taken name conflicts.
#[derive(Clone)]
pub enum Behavior {
    Apply(Arc<dyn Applier>),
    Check(Arc<dyn Checker>),
    Divide(Arc<dyn Divider>),
    Serialize(Arc<dyn Serializer>),
    Deserialize(Arc<dyn Deserializer>),
}

impl Behavior {
    /// Wrap a closure as an apply behavior
    pub fn apply<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(Value, &Value, &Bindings, &TypeRegistry) -> Result<Value> + Send + Sync + 'static,
    {
        let descriptor = Descriptor::new(name, BehaviorKind::Apply.default_parameters());
        Behavior::Apply(Arc::new(Function::new(descriptor, function)))
    }

    /// Wrap a closure as a check behavior
    pub fn check<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Value, &Bindings, &TypeRegistry) -> bool + Send + Sync + 'static,
    {
        let descriptor = Descriptor::new(name, BehaviorKind::Check.default_parameters());
        Behavior::Check(Arc::new(Function::new(descriptor, function)))
    }

    /// Wrap a closure as a divide behavior
    pub fn divide<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Value, &Bindings, &TypeRegistry) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        let descriptor = Descriptor::new(name, BehaviorKind::Divide.default_parameters());
        Behavior::Divide(Arc::new(Function::new(descriptor, function)))
    }

    /// Wrap a closure as a serialize behavior
    pub fn serialize<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Value, &Bindings, &TypeRegistry) -> Result<Value> + Send + Sync + 'static,
    {
        let descriptor = Descriptor::new(name, BehaviorKind::Serialize.default_parameters());
        Behavior::Serialize(Arc::new(SerializeFunction(Function::new(descriptor, function))))
    }

    /// Wrap a closure as a deserialize behavior
    pub fn deserialize<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Value, &Bindings, &TypeRegistry) -> Result<Value> + Send + Sync + 'static,
    {
        let descriptor = Descriptor::new(name, BehaviorKind::Deserialize.default_parameters());
        Behavior::Deserialize(Arc::new(Function::new(descriptor, function)))
    }

    /// The category this behavior belongs to
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Apply(_) => BehaviorKind::Apply,
            Behavior::Check(_) => BehaviorKind::Check,
            Behavior::Divide(_) => BehaviorKind::Divide,
            Behavior::Serialize(_) => BehaviorKind::Serialize,
            Behavior::Deserialize(_) => BehaviorKind::Deserialize,
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        match self {
            Behavior::Apply(inner) => inner.descriptor(),
            Behavior::Check(inner) => inner.descriptor(),
            Behavior::Divide(inner) => inner.descriptor(),
            Behavior::Serialize(inner) => inner.descriptor(),
            Behavior::Deserialize(inner) => inner.descriptor(),
        }
    }

    /// The canonical name this behavior registers under
    pub fn name(&self) -> &str {
        self.descriptor().name()
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for Behavior {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Behavior::Apply(a), Behavior::Apply(b)) => same_instance(a, b),
            (Behavior::Check(a), Behavior::Check(b)) => same_instance(a, b),
            (Behavior::Divide(a), Behavior::Divide(b)) => same_instance(a, b),
            (Behavior::Serialize(a), Behavior::Serialize(b)) => same_instance(a, b),
            (Behavior::Deserialize(a), Behavior::Deserialize(b)) => same_instance(a, b),
            _ => false,
        }
    }
}

/// Compares data pointers only; vtable pointers may differ between codegen units.
fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl Registrable for Behavior {
    fn same_entry(&self, other: &Self) -> bool {
        self == other
    }

    fn parameters(&self) -> Option<&[&'static str]> {
        Some(self.descriptor().parameters())
    }

    fn label(&self) -> String {
        format!("<{} {}>", self.kind(), self.name())
    }
}

/// A closure carrying its own [`Descriptor`].
///
/// Implements the behavior trait matching the closure's signature. Serialize
/// and deserialize closures share a signature, so serializers are wrapped in
/// [`SerializeFunction`] to keep the two implementations apart.
pub struct Function<F> {
    descriptor: Descriptor,
    function: F,
}

impl<F> Function<F> {
    pub fn new(descriptor: Descriptor, function: F) -> Self {
        Self {
            descriptor,
            function,
        }
    }
}

impl<F> Applier for Function<F>
where
    F: Fn(Value, &Value, &Bindings, &TypeRegistry) -> Result<Value> + Send + Sync,
{
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn apply(
        &self,
        current: Value,
        update: &Value,
        bindings: &Bindings,
        registry: &TypeRegistry,
    ) -> Result<Value> {
        (self.function)(current, update, bindings, registry)
    }
}

impl<F> Checker for Function<F>
where
    F: Fn(&Value, &Bindings, &TypeRegistry) -> bool + Send + Sync,
{
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn check(&self, state: &Value, bindings: &Bindings, registry: &TypeRegistry) -> bool {
        (self.function)(state, bindings, registry)
    }
}

impl<F> Divider for Function<F>
where
    F: Fn(&Value, &Bindings, &TypeRegistry) -> Result<Vec<Value>> + Send + Sync,
{
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn divide(
        &self,
        value: &Value,
        bindings: &Bindings,
        registry: &TypeRegistry,
    ) -> Result<Vec<Value>> {
        (self.function)(value, bindings, registry)
    }
}

impl<F> Deserializer for Function<F>
where
    F: Fn(&Value, &Bindings, &TypeRegistry) -> Result<Value> + Send + Sync,
{
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn deserialize(
        &self,
        serialized: &Value,
        bindings: &Bindings,
        registry: &TypeRegistry,
    ) -> Result<Value> {
        (self.function)(serialized, bindings, registry)
    }
}

/// A serializer closure; see [`Function`].
pub struct SerializeFunction<F>(pub Function<F>);

impl<F> Serializer for SerializeFunction<F>
where
    F: Fn(&Value, &Bindings, &TypeRegistry) -> Result<Value> + Send + Sync,
{
    fn descriptor(&self) -> &Descriptor {
        &self.0.descriptor
    }

    fn serialize(
        &self,
        value: &Value,
        bindings: &Bindings,
        registry: &TypeRegistry,
    ) -> Result<Value> {
        (self.0.function)(value, bindings, registry)
    }
}
