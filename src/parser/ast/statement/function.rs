use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

use super::super::{Block, Expression, Id, TypeName};

/// A single `name type [= default]` function parameter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Parameter<T> {
    pub id: Id<T>,
    pub type_name: TypeName,
    pub default: Option<Expression<T>>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Parameter<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let id = Id::parse(tokens)?;
        let position = id.position.clone();
        let type_name = TypeName::parse(tokens)?;

        let mut default = None;
        if tokens.accept(TokenKind::Assign).is_some() {
            default = Some(Expression::parse(tokens)?);
        }

        Ok(Parameter {
            id,
            type_name,
            default,
            info: (),
            position,
        })
    }
}

/// `func <name>(<parameters>) [return-type] { ... }`. Without a return type
/// the function is void and may only be called in statement position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Function<T> {
    pub id: Id<T>,
    pub parameters: Vec<Parameter<T>>,
    pub return_type: Option<TypeName>,
    pub block: Block<T>,
    pub info: T,
    pub position: Span,
}

impl FromTokens for Function<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        let position = tokens.expect(TokenKind::Func)?.span;
        let id = Id::parse(tokens)?;

        tokens.expect(TokenKind::LParen)?;
        let mut parameters = vec![];
        if !tokens.peek_kind(TokenKind::RParen) {
            loop {
                parameters.push(Parameter::parse(tokens)?);
                if tokens.accept(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        tokens.expect(TokenKind::RParen)?;

        let mut return_type = None;
        if tokens.peek_kind(TokenKind::Name) {
            return_type = Some(TypeName::parse(tokens)?);
        }

        let block = Block::parse(tokens)?;

        Ok(Function {
            id,
            parameters,
            return_type,
            block,
            info: (),
            position,
        })
    }
}
