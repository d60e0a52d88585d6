mod assignment;
mod binary;
mod block;
mod bool;
mod call;
mod character;
mod id;
mod logical;
mod num;
mod prefix;
mod relation;

pub use self::assignment::*;
pub use self::binary::*;
pub use self::block::*;
pub use self::bool::*;
pub use self::call::*;
pub use self::character::*;
pub use self::id::*;
pub use self::logical::*;
pub use self::num::*;
pub use self::prefix::*;
pub use self::relation::*;

use crate::{
    lexer::{Span, TokenKind},
    parser::{FromTokens, ParseError, ParseState},
};

/// An expression: a construct which yields a value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Expression<T> {
    Id(Id<T>),
    Num(Num<T>),
    Character(Character<T>),
    Bool(Bool<T>),
    Binary(Box<Binary<T>>),
    Relation(Box<Relation<T>>),
    Logical(Box<Logical<T>>),
    Prefix(Box<Prefix<T>>),
    /// A parenthesized expression. Kept as its own node so that formatting a
    /// parsed tree reproduces the parentheses.
    Grouped(Box<Expression<T>>),
    Assignment(Box<Assignment<T>>),
    /// A `{ ... }` block in expression position; its value is the value of
    /// the trailing expression statement.
    Block(Block<T>),
    Call(Call<T>),
}

impl<T> Expression<T>
where
    T: Clone,
{
    pub fn get_info(&self) -> T {
        match self {
            Expression::Id(Id { info, .. }) => info.clone(),
            Expression::Num(num) => num.get_info(),
            Expression::Character(Character { info, .. }) => info.clone(),
            Expression::Bool(Bool { info, .. }) => info.clone(),
            Expression::Binary(binary) => binary.info.clone(),
            Expression::Relation(relation) => relation.info.clone(),
            Expression::Logical(logical) => logical.info.clone(),
            Expression::Prefix(prefix) => prefix.info.clone(),
            Expression::Grouped(inner) => inner.get_info(),
            Expression::Assignment(assignment) => assignment.info.clone(),
            Expression::Block(Block { info, .. }) => info.clone(),
            Expression::Call(Call { info, .. }) => info.clone(),
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Expression::Id(Id { position, .. }) => position.clone(),
            Expression::Num(num) => num.position(),
            Expression::Character(Character { position, .. }) => position.clone(),
            Expression::Bool(Bool { position, .. }) => position.clone(),
            Expression::Binary(binary) => binary.position.clone(),
            Expression::Relation(relation) => relation.position.clone(),
            Expression::Logical(logical) => logical.position.clone(),
            Expression::Prefix(prefix) => prefix.position.clone(),
            Expression::Grouped(inner) => inner.position(),
            Expression::Assignment(assignment) => assignment.position.clone(),
            Expression::Block(Block { position, .. }) => position.clone(),
            Expression::Call(Call { position, .. }) => position.clone(),
        }
    }
}

impl FromTokens for Expression<()> {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError> {
        parse_assignment(tokens)
    }
}

/// `assignment → logical_or ( '=' logical_or )?`
///
/// At most one `=` per expression. Whether the left hand side is actually
/// assignable is decided by the type checker.
fn parse_assignment(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = tokens.span();
    let lhs = parse_logical_or(tokens)?;

    if tokens.accept(TokenKind::Assign).is_some() {
        let rhs = parse_logical_or(tokens)?;
        return Ok(Expression::Assignment(Box::new(Assignment {
            lvalue: lhs,
            rvalue: rhs,
            info: (),
            position,
        })));
    }

    Ok(lhs)
}

fn parse_logical_or(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = tokens.span();
    let mut lhs = parse_logical_and(tokens)?;

    while tokens.accept(TokenKind::LogicalOr).is_some() {
        let rhs = parse_logical_and(tokens)?;
        lhs = Expression::Logical(Box::new(Logical {
            op: LogicalOperator::Or,
            lhs,
            rhs,
            info: (),
            position: position.clone(),
        }));
    }

    Ok(lhs)
}

fn parse_logical_and(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = tokens.span();
    let mut lhs = parse_relational(tokens)?;

    while tokens.accept(TokenKind::LogicalAnd).is_some() {
        let rhs = parse_relational(tokens)?;
        lhs = Expression::Logical(Box::new(Logical {
            op: LogicalOperator::And,
            lhs,
            rhs,
            info: (),
            position: position.clone(),
        }));
    }

    Ok(lhs)
}

/// `relational → additive ( relop additive )?`
///
/// Non-associative: `a < b < c` is a syntax error.
fn parse_relational(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = tokens.span();
    let lhs = parse_additive(tokens)?;

    if let Some(op) = accept_relation_operator(tokens) {
        let rhs = parse_additive(tokens)?;

        if accept_relation_operator(tokens).is_some() {
            return Err(ParseError {
                message: "chained comparisons are not allowed".into(),
                position: Some(position),
            });
        }

        return Ok(Expression::Relation(Box::new(Relation {
            op,
            lhs,
            rhs,
            info: (),
            position,
        })));
    }

    Ok(lhs)
}

fn accept_relation_operator(tokens: &mut ParseState) -> Option<RelationOperator> {
    let op = match tokens.peek()?.kind {
        TokenKind::LessThan => RelationOperator::LessThan,
        TokenKind::LessOrEqual => RelationOperator::LessOrEqual,
        TokenKind::GreaterThan => RelationOperator::GreaterThan,
        TokenKind::GreaterOrEqual => RelationOperator::GreaterOrEqual,
        TokenKind::Equal => RelationOperator::Equal,
        TokenKind::NotEqual => RelationOperator::NotEqual,
        _ => return None,
    };
    tokens.next();
    Some(op)
}

fn parse_additive(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = tokens.span();
    let mut lhs = parse_multiplicative(tokens)?;

    loop {
        let op = if tokens.accept(TokenKind::Plus).is_some() {
            BinaryOperator::Plus
        } else if tokens.accept(TokenKind::Minus).is_some() {
            BinaryOperator::Minus
        } else {
            break;
        };

        let rhs = parse_multiplicative(tokens)?;
        lhs = Expression::Binary(Box::new(Binary {
            op,
            lhs,
            rhs,
            info: (),
            position: position.clone(),
        }));
    }

    Ok(lhs)
}

fn parse_multiplicative(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = tokens.span();
    let mut lhs = parse_factor(tokens)?;

    loop {
        let op = if tokens.accept(TokenKind::Times).is_some() {
            BinaryOperator::Times
        } else if tokens.accept(TokenKind::Divide).is_some() {
            BinaryOperator::DividedBy
        } else {
            break;
        };

        let rhs = parse_factor(tokens)?;
        lhs = Expression::Binary(Box::new(Binary {
            op,
            lhs,
            rhs,
            info: (),
            position: position.clone(),
        }));
    }

    Ok(lhs)
}

fn parse_factor(tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let Some(token) = tokens.peek().cloned() else {
        return Err(ParseError::eof("expression"));
    };

    match token.kind {
        TokenKind::Integer | TokenKind::Float => Ok(Expression::Num(Num::parse(tokens)?)),
        TokenKind::Char => Ok(Expression::Character(Character::parse(tokens)?)),
        TokenKind::True | TokenKind::False => Ok(Expression::Bool(Bool::parse(tokens)?)),
        TokenKind::Name => {
            let id = Id::parse(tokens)?;
            // a name followed by '(' is always a call
            if tokens.peek_kind(TokenKind::LParen) {
                return parse_call(id, tokens);
            }
            Ok(Expression::Id(id))
        }
        TokenKind::Minus | TokenKind::Plus | TokenKind::LogicalNot => {
            let op = match token.kind {
                TokenKind::Minus => PrefixOperator::Minus,
                TokenKind::Plus => PrefixOperator::Plus,
                _ => PrefixOperator::Negation,
            };
            tokens.next();
            let inner = parse_factor(tokens)?;
            Ok(Expression::Prefix(Box::new(Prefix {
                op,
                inner,
                info: (),
                position: token.span,
            })))
        }
        TokenKind::LParen => {
            tokens.next();
            let inner = Expression::parse(tokens)?;
            tokens.expect(TokenKind::RParen)?;
            Ok(Expression::Grouped(Box::new(inner)))
        }
        TokenKind::LBrace => Ok(Expression::Block(Block::parse(tokens)?)),
        kind => Err(ParseError {
            message: format!("unexpected {kind} in expression"),
            position: Some(token.span),
        }),
    }
}

fn parse_call(id: Id<()>, tokens: &mut ParseState) -> Result<Expression<()>, ParseError> {
    let position = id.position.clone();

    tokens.expect(TokenKind::LParen)?;

    let mut arguments = vec![];
    if !tokens.peek_kind(TokenKind::RParen) {
        loop {
            arguments.push(Expression::parse(tokens)?);
            if tokens.accept(TokenKind::Comma).is_none() {
                break;
            }
        }
    }

    tokens.expect(TokenKind::RParen)?;

    Ok(Expression::Call(Call {
        id,
        arguments,
        info: (),
        position,
    }))
}
