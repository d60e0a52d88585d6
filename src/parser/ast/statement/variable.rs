use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::{Expression, Id, TypeName};

/// `var <name> [type] [= <initializer>];` — a mutable binding. At least one
/// of the annotation and the initializer must be present; without an
/// initializer the binding starts at the zero value of its type. The type
/// checker enforces both rules.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Variable<T> {
    pub id: Id<T>,
    pub type_name: Option<TypeName>,
    pub value: Option<Expression<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Variable<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::Var)?.span;
        let id = Id::parse(tokens)?;

        let mut type_name = None;
        if tokens.peek_kind(TokenKind::Name) {
            type_name = Some(TypeName::parse(tokens)?);
        }

        let mut value = None;
        if tokens.accept(TokenKind::Assign).is_some() {
            value = Some(Expression::parse(tokens)?);
        }

        tokens.expect(TokenKind::Semicolon)?;

        Ok(Variable {
            id,
            type_name,
            value,
            info: (),
            position,
        })
    }
}
