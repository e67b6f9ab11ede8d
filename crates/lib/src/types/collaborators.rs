//! Pluggable fallbacks consulted when a name is not registered.
//!
//! The registry itself only resolves names it holds. A type expression such
//! as `list[int]` is handed to an [`ExpressionParser`], and a behavior name
//! missing from its sub-registry is handed to a [`FunctionResolver`]. Both
//! are implemented for plain closures.

use crate::{
    Result, Value,
    types::{Behavior, BehaviorKind},
};

/// Turns a textual type expression into a structured schema.
pub trait ExpressionParser: Send + Sync {
    /// Parse `expression`.
    ///
    /// Returning the expression unchanged as [`Value::Text`] means it did not
    /// describe anything the parser understands.
    fn parse(&self, expression: &str) -> Result<Value>;
}

impl<F> ExpressionParser for F
where
    F: Fn(&str) -> Result<Value> + Send + Sync,
{
    fn parse(&self, expression: &str) -> Result<Value> {
        self(expression)
    }
}

/// Finds a behavior implementation by qualified name.
pub trait FunctionResolver: Send + Sync {
    fn resolve(&self, kind: BehaviorKind, name: &str) -> Option<Behavior>;
}

impl<F> FunctionResolver for F
where
    F: Fn(BehaviorKind, &str) -> Option<Behavior> + Send + Sync,
{
    fn resolve(&self, kind: BehaviorKind, name: &str) -> Option<Behavior> {
        self(kind, name)
    }
}
