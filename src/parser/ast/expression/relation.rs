use std::fmt::Display;

use crate::lexer::Span;

use super::Expression;

/// Comparison operator; always yields a boolean. Comparisons do not chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RelationOperator {
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

impl RelationOperator {
    /// `==` and `!=` apply to every scalar type; the ordering operators do
    /// not accept booleans.
    pub fn is_equality(&self) -> bool {
        matches!(self, RelationOperator::Equal | RelationOperator::NotEqual)
    }
}

impl Display for RelationOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            RelationOperator::LessThan => "<",
            RelationOperator::LessOrEqual => "<=",
            RelationOperator::GreaterThan => ">",
            RelationOperator::GreaterOrEqual => ">=",
            RelationOperator::Equal => "==",
            RelationOperator::NotEqual => "!=",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Relation<T> {
    pub op: RelationOperator,
    pub lhs: Expression<T>,
    pub rhs: Expression<T>,
    pub info: T,
    pub position: Span,
}
