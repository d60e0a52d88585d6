use crate::lexer::Span;

use super::Expression;

/// Assignment in expression position; it yields the assigned value. The left
/// hand side must turn out to be a mutable name, which the type checker
/// verifies.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Assignment<T> {
    pub lvalue: Expression<T>,
    pub rvalue: Expression<T>,
    pub info: T,
    pub position: Span,
}
