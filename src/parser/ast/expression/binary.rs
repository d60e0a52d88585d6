use std::fmt::Display;

use crate::lexer::Span;

use super::Expression;

/// Arithmetic operator. Operands must share a numeric type; integer division
/// is floor division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    DividedBy,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::DividedBy => "/",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Binary<T> {
    pub op: BinaryOperator,
    pub lhs: Expression<T>,
    pub rhs: Expression<T>,
    pub info: T,
    pub position: Span,
}
