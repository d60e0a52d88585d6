use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

/// A character literal, stored verbatim with its quotes. Escape decoding is
/// deferred to evaluation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Character<T> {
    pub lexeme: String,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Character<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let token = tokens.expect(TokenKind::Char)?;

        Ok(Character {
            lexeme: token.lexeme,
            info: (),
            position: token.span,
        })
    }
}
