use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bool<T> {
    pub value: bool,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Bool<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        if let Some(token) = tokens.accept(TokenKind::True) {
            return Ok(Bool {
                value: true,
                info: (),
                position: token.span,
            });
        }

        let token = tokens.expect(TokenKind::False)?;
        Ok(Bool {
            value: false,
            info: (),
            position: token.span,
        })
    }
}
