use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::{Expression, Id, TypeName};

/// `const <name> [type] = <initializer>;` — a write-once binding.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Constant<T> {
    pub id: Id<T>,
    pub type_name: Option<TypeName>,
    pub value: Expression<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Constant<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::Const)?.span;
        let id = Id::parse(tokens)?;

        // the optional type annotation is just another name
        let mut type_name = None;
        if tokens.peek_kind(TokenKind::Name) {
            type_name = Some(TypeName::parse(tokens)?);
        }

        tokens.expect(TokenKind::Assign)?;
        let value = Expression::parse(tokens)?;
        tokens.expect(TokenKind::Semicolon)?;

        Ok(Constant {
            id,
            type_name,
            value,
            info: (),
            position,
        })
    }
}
