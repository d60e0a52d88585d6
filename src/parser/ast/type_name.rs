use std::fmt::Display;

use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

/// A type annotation as written in the source. Type names lex as plain names;
/// the parser picks them up by position, the type checker resolves them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeName {
    pub name: String,
    pub position: Span,
}

impl FromTokens for TypeName {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let token = tokens.expect(TokenKind::Name)?;

        Ok(TypeName {
            name: token.lexeme,
            position: token.span,
        })
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
