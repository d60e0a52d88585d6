use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::Statement;

/// A brace-delimited sequence of statements. Blocks serve two roles: as the
/// body of `if`/`while`/`func` (and as a bare statement, opening a nested
/// scope), and as a compound expression whose value is the value of the
/// trailing expression statement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Block<T> {
    pub statements: Vec<Statement<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Block<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::LBrace)?.span;

        let mut statements = vec![];
        while !tokens.peek_kind(TokenKind::RBrace) {
            if tokens.peek_kind(TokenKind::Eof) {
                return Err(ParseError {
                    message: "unclosed block".into(),
                    position: Some(position),
                });
            }
            statements.push(Statement::parse(tokens)?);
        }

        tokens.expect(TokenKind::RBrace)?;

        Ok(Block {
            statements,
            info: (),
            position,
        })
    }
}
