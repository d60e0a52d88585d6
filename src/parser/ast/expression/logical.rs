use std::fmt::Display;

use crate::lexer::Span;

use super::Expression;

/// Short-circuit logical operator: the right operand is only evaluated when
/// the left one does not already decide the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Logical<T> {
    pub op: LogicalOperator,
    pub lhs: Expression<T>,
    pub rhs: Expression<T>,
    pub info: T,
    pub position: Span,
}
