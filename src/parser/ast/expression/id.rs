use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

/// Reference to a named binding.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Id<T> {
    pub name: String,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Id<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let token = tokens.expect(TokenKind::Name)?;

        Ok(Id {
            name: token.lexeme,
            info: (),
            position: token.span,
        })
    }
}
