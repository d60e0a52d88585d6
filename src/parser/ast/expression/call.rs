use crate::lexer::Span;

use super::{Expression, Id};

/// Application of a named function to a list of arguments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Call<T> {
    pub id: Id<T>,
    pub arguments: Vec<Expression<T>>,
    pub info: T,
    pub position: Span,
}
