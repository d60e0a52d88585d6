//! Recursive-descent parser for Wabbit.
//!
//! The parser consumes the token stream produced by the lexer and builds the
//! AST defined in [`ast`]. Statements dispatch on their first token; the
//! expression grammar is a precedence ladder living in
//! [`ast::Expression::parse`]. A mismatched token aborts the parse with a
//! [`ParseError`] carrying the offending position.

pub mod ast;
mod state;

pub use state::*;

use std::{error::Error, fmt::Display};

use crate::lexer::{Span, Token, TokenKind};

use self::ast::Statement;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Span>,
}

impl ParseError {
    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit end of input while parsing {item}"),
            position: None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(position) = &self.position {
            f.write_fmt(format_args!("line {}: {}", position.line, self.message))
        } else {
            f.write_str(&self.message)
        }
    }
}

impl Error for ParseError {}

/// Trait for constructing an AST node from the token stream.
pub trait FromTokens: Sized {
    fn parse(tokens: &mut ParseState) -> Result<Self, ParseError>;
}

/// Parse a whole program: a sequence of statements terminated by `Eof`.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Statement<()>>, ParseError> {
    let mut tokens = ParseState::new(tokens);
    let mut statements = vec![];

    while !tokens.peek_kind(TokenKind::Eof) {
        if tokens.peek().is_none() {
            return Err(ParseError::eof("statement"));
        }
        statements.push(Statement::parse(&mut tokens)?);
    }

    tokens.expect(TokenKind::Eof)?;

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::ast::*;
    use super::*;
    use crate::lexer::Lexer;

    fn parse_source(input: &str) -> Result<Vec<Statement<()>>, ParseError> {
        let (tokens, errors) = Lexer::new(input).lex();
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        parse(tokens)
    }

    #[test]
    fn test_parse_empty_program() {
        assert_eq!(parse_source(""), Ok(vec![]));
    }

    #[test]
    fn test_parse_print_statement() {
        let statements = parse_source("print 42;").unwrap();
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Statement::Print(_)));
    }

    #[test]
    fn test_parse_precedence() {
        let statements = parse_source("print 2 + 3 * 4;").unwrap();
        let Statement::Print(print) = &statements[0] else {
            panic!("expected print statement");
        };

        let Expression::Binary(binary) = &print.value else {
            panic!("expected binary expression");
        };
        assert_eq!(binary.op, BinaryOperator::Plus);
        assert!(matches!(binary.lhs, Expression::Num(_)));
        assert!(matches!(&binary.rhs, Expression::Binary(inner) if inner.op == BinaryOperator::Times));
    }

    #[test]
    fn test_parse_relation_binds_looser_than_additive() {
        let statements = parse_source("print 1 + 2 < 3;").unwrap();
        let Statement::Print(print) = &statements[0] else {
            panic!("expected print statement");
        };
        let Expression::Relation(relation) = &print.value else {
            panic!("expected relational expression");
        };
        assert_eq!(relation.op, RelationOperator::LessThan);
    }

    #[test]
    fn test_parse_chained_comparison_is_rejected() {
        let result = parse_source("print 1 < 2 < 3;");
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("chained"));
    }

    #[test]
    fn test_parse_missing_semicolon() {
        assert!(parse_source("print 1").is_err());
    }

    #[test]
    fn test_parse_assignment_yields_expression() {
        let statements = parse_source("x = y = 1;");
        // exactly one '=' per expression
        assert!(statements.is_err());

        let statements = parse_source("x = 1 + 2;").unwrap();
        let Statement::Expression(Expression::Assignment(_)) = &statements[0] else {
            panic!("expected assignment expression statement");
        };
    }

    #[test]
    fn test_parse_call_without_symbol_table() {
        // names followed by '(' always parse as calls, even before any
        // function definition has been seen
        let statements = parse_source("print square(2);").unwrap();
        let Statement::Print(print) = &statements[0] else {
            panic!("expected print statement");
        };
        assert!(matches!(&print.value, Expression::Call(call) if call.id.name == "square"));
    }

    #[test]
    fn test_parse_function_definition() {
        let statements = parse_source("func add(x int, y int = 2) int { return x + y; }").unwrap();
        let Statement::Function(function) = &statements[0] else {
            panic!("expected function definition");
        };

        assert_eq!(function.id.name, "add");
        assert_eq!(function.parameters.len(), 2);
        assert_eq!(function.parameters[0].type_name.name, "int");
        assert!(function.parameters[0].default.is_none());
        assert!(function.parameters[1].default.is_some());
        assert_eq!(function.return_type.as_ref().unwrap().name, "int");
    }

    #[test]
    fn test_parse_compound_expression() {
        let statements = parse_source("var x = { 1; 2; };").unwrap();
        let Statement::Variable(variable) = &statements[0] else {
            panic!("expected variable declaration");
        };
        let Some(Expression::Block(block)) = &variable.value else {
            panic!("expected compound expression initializer");
        };
        assert_eq!(block.statements.len(), 2);
    }

    #[test]
    fn test_parse_if_else() {
        let statements = parse_source("if a < b { print a; } else { print b; }").unwrap();
        let Statement::If(if_statement) = &statements[0] else {
            panic!("expected if statement");
        };
        assert!(if_statement.else_block.is_some());
    }

    #[test]
    fn test_parse_while_with_break_and_continue() {
        let statements = parse_source("while true { break; continue; }").unwrap();
        let Statement::WhileLoop(while_loop) = &statements[0] else {
            panic!("expected while loop");
        };
        assert!(matches!(while_loop.block.statements[0], Statement::Break(_)));
        assert!(matches!(while_loop.block.statements[1], Statement::Continue(_)));
    }

    #[test]
    fn test_parse_declarations() {
        let statements = parse_source("const pi = 3.14159; var r float; var n int = 0;").unwrap();
        assert!(matches!(&statements[0], Statement::Constant(c) if c.type_name.is_none()));
        assert!(
            matches!(&statements[1], Statement::Variable(v) if v.type_name.is_some() && v.value.is_none())
        );
        assert!(
            matches!(&statements[2], Statement::Variable(v) if v.type_name.is_some() && v.value.is_some())
        );
    }

    #[test]
    fn test_parse_grouping_is_preserved() {
        let statements = parse_source("print (2 + 3) * 4;").unwrap();
        let Statement::Print(print) = &statements[0] else {
            panic!("expected print statement");
        };
        let Expression::Binary(binary) = &print.value else {
            panic!("expected binary expression");
        };
        assert!(matches!(binary.lhs, Expression::Grouped(_)));
    }
}
