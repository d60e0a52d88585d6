use std::fmt::Display;

use crate::lexer::Span;

use super::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PrefixOperator {
    Minus,
    Plus,
    Negation,
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            PrefixOperator::Minus => "-",
            PrefixOperator::Plus => "+",
            PrefixOperator::Negation => "!",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Prefix<T> {
    pub op: PrefixOperator,
    pub inner: Expression<T>,
    pub info: T,
    pub position: Span,
}
