use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::{Block, Expression};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct If<T> {
    pub condition: Expression<T>,
    pub if_block: Block<T>,
    pub else_block: Option<Block<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for If<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::If)?.span;
        let condition = Expression::parse(tokens)?;
        let if_block = Block::parse(tokens)?;

        let mut else_block = None;
        if tokens.accept(TokenKind::Else).is_some() {
            else_block = Some(Block::parse(tokens)?);
        }

        Ok(If {
            condition,
            if_block,
            else_block,
            info: (),
            position,
        })
    }
}
