use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::{Block, Expression};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhileLoop<T> {
    pub condition: Expression<T>,
    pub block: Block<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for WhileLoop<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::While)?.span;
        let condition = Expression::parse(tokens)?;
        let block = Block::parse(tokens)?;

        Ok(WhileLoop {
            condition,
            block,
            info: (),
            position,
        })
    }
}
