mod constant;
mod function;
mod if_statement;
mod print;
mod variable;
mod while_loop;

pub use self::constant::*;
pub use self::function::*;
pub use self::if_statement::*;
pub use self::print::*;
pub use self::variable::*;
pub use self::while_loop::*;

use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::{Block, Expression};

/// A statement: a construct which performs an action.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Statement<T> {
    /// An expression evaluated for its effect; the value is discarded.
    Expression(Expression<T>),
    Print(Print<T>),
    Constant(Constant<T>),
    Variable(Variable<T>),
    If(If<T>),
    WhileLoop(WhileLoop<T>),
    Break(Span),
    Continue(Span),
    Return(Return<T>),
    Function(Function<T>),
    /// A bare `{ ... }` block opening a nested lexical scope.
    Block(Block<T>),
}

impl FromTokens for Statement<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let Some(token) = tokens.peek() else {
            return Err(ParseError::eof("statement"));
        };

        match token.kind {
            TokenKind::Break => {
                let token = tokens.expect(TokenKind::Break)?;
                tokens.expect(TokenKind::Semicolon)?;
                Ok(Statement::Break(token.span))
            }
            TokenKind::Continue => {
                let token = tokens.expect(TokenKind::Continue)?;
                tokens.expect(TokenKind::Semicolon)?;
                Ok(Statement::Continue(token.span))
            }
            TokenKind::Return => Ok(Statement::Return(Return::parse(tokens)?)),
            TokenKind::Print => Ok(Statement::Print(Print::parse(tokens)?)),
            TokenKind::Const => Ok(Statement::Constant(Constant::parse(tokens)?)),
            TokenKind::Var => Ok(Statement::Variable(Variable::parse(tokens)?)),
            TokenKind::If => Ok(Statement::If(If::parse(tokens)?)),
            TokenKind::While => Ok(Statement::WhileLoop(WhileLoop::parse(tokens)?)),
            TokenKind::Func => Ok(Statement::Function(Function::parse(tokens)?)),
            TokenKind::LBrace => Ok(Statement::Block(Block::parse(tokens)?)),
            _ => {
                let expression = Expression::parse(tokens)?;
                tokens.expect(TokenKind::Semicolon)?;
                Ok(Statement::Expression(expression))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Return<T> {
    pub value: Expression<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Return<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::Return)?.span;
        let value = Expression::parse(tokens)?;
        tokens.expect(TokenKind::Semicolon)?;

        Ok(Return {
            value,
            info: (),
            position,
        })
    }
}
