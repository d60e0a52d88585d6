use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::Expression;

/// `print <expression>;` — emits the value on the program's standard output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Print<T> {
    pub value: Expression<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Print<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::Print)?.span;
        let value = Expression::parse(tokens)?;
        tokens.expect(TokenKind::Semicolon)?;

        Ok(Print {
            value,
            info: (),
            position,
        })
    }
}
