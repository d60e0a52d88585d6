use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

/// A numeric literal. The lexeme is kept as source text; turning it into an
/// actual machine value happens lazily at evaluation or lowering.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Num<T> {
    Integer(String, T, Span),
    FloatingPoint(String, T, Span),
}

impl<T> Num<T>
where
    T: Clone,
{
    pub fn lexeme(&self) -> &str {
        match self {
            Num::Integer(lexeme, _, _) => lexeme,
            Num::FloatingPoint(lexeme, _, _) => lexeme,
        }
    }

    pub fn get_info(&self) -> T {
        match self {
            Num::Integer(_, info, _) => info.clone(),
            Num::FloatingPoint(_, info, _) => info.clone(),
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Num::Integer(_, _, position) => position.clone(),
            Num::FloatingPoint(_, _, position) => position.clone(),
        }
    }
}

impl FromTokens for Num<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        if let Some(token) = tokens.accept(TokenKind::Integer) {
            return Ok(Num::Integer(token.lexeme, (), token.span));
        }

        let token = tokens.expect(TokenKind::Float)?;
        Ok(Num::FloatingPoint(token.lexeme, (), token.span))
    }
}
