//! Lexical analysis for Wabbit.
//!
//! The lexer turns raw source text into a sequence of [`Token`]s terminated by
//! a single `Eof` token. Bad input (illegal characters, unterminated character
//! literals) is reported and skipped so that several lexical errors can
//! surface in a single run; the parser will reject the stream downstream.

mod terminals;
mod token;

pub use terminals::*;
pub use token::*;

use once_cell::sync::Lazy;
use std::{error::Error, fmt::Display};

static TERMINALS: Lazy<TerminalTable> = Lazy::new(|| {
    let mut t = TerminalTable::default();

    t.keyword("const", TokenKind::Const);
    t.keyword("var", TokenKind::Var);
    t.keyword("print", TokenKind::Print);
    t.keyword("break", TokenKind::Break);
    t.keyword("continue", TokenKind::Continue);
    t.keyword("if", TokenKind::If);
    t.keyword("else", TokenKind::Else);
    t.keyword("while", TokenKind::While);
    t.keyword("func", TokenKind::Func);
    t.keyword("return", TokenKind::Return);
    t.keyword("true", TokenKind::True);
    t.keyword("false", TokenKind::False);

    t.operator("+", TokenKind::Plus);
    t.operator("-", TokenKind::Minus);
    t.operator("*", TokenKind::Times);
    t.operator("/", TokenKind::Divide);
    t.operator("<", TokenKind::LessThan);
    t.operator("<=", TokenKind::LessOrEqual);
    t.operator(">", TokenKind::GreaterThan);
    t.operator(">=", TokenKind::GreaterOrEqual);
    t.operator("==", TokenKind::Equal);
    t.operator("!=", TokenKind::NotEqual);
    t.operator("&&", TokenKind::LogicalAnd);
    t.operator("||", TokenKind::LogicalOr);
    t.operator("!", TokenKind::LogicalNot);
    t.operator("=", TokenKind::Assign);
    t.operator(";", TokenKind::Semicolon);
    t.operator(",", TokenKind::Comma);
    t.operator("(", TokenKind::LParen);
    t.operator(")", TokenKind::RParen);
    t.operator("{", TokenKind::LBrace);
    t.operator("}", TokenKind::RBrace);

    t
});

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LexError {
    pub message: String,
    pub line: usize,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("line {}: {}", self.line, self.message))
    }
}

impl Error for LexError {}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    position: usize,
    line: usize,
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: vec![],
            errors: vec![],
            position: 0,
            line: 1,
            input,
        }
    }

    /// Scan the whole input. Returns all tokens (always ending in `Eof`)
    /// together with the lexical errors encountered along the way.
    pub fn lex(mut self) -> (Vec<Token>, Vec<LexError>) {
        while self.position < self.input.len() {
            self.eat_whitespace();

            if self.position >= self.input.len() {
                break;
            }

            if self.eat_comment() {
                continue;
            }

            match self.input.as_bytes()[self.position] {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_alphanumeric(),
                b'0'..=b'9' => self.lex_numeric(),
                b'\'' => self.lex_character(),
                _ => self.lex_special(),
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.span()));

        (self.tokens, self.errors)
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.position)
    }

    fn error(&mut self, message: impl ToString) {
        self.errors.push(LexError {
            message: message.to_string(),
            line: self.line,
        });
    }

    fn eat_whitespace(&mut self) {
        while let Some(c) = self.input.as_bytes().get(self.position) {
            if !c.is_ascii_whitespace() {
                return;
            }

            if *c == b'\n' {
                self.line += 1;
            }
            self.position += 1;
        }
    }

    /// Skip a line or block comment starting at the current position. An
    /// unterminated block comment consumes the rest of the input.
    fn eat_comment(&mut self) -> bool {
        let rest = &self.input[self.position..];

        if rest.starts_with("//") {
            while let Some(c) = self.input.as_bytes().get(self.position) {
                if *c == b'\n' {
                    break;
                }
                self.position += 1;
            }
            return true;
        }

        if rest.starts_with("/*") {
            self.position += 2;
            while self.position < self.input.len() {
                if self.input[self.position..].starts_with("*/") {
                    self.position += 2;
                    return true;
                }
                if self.input.as_bytes()[self.position] == b'\n' {
                    self.line += 1;
                }
                self.position += 1;
            }
            return true;
        }

        false
    }

    fn lex_alphanumeric(&mut self) {
        let start = self.position;
        let span = self.span();

        while let Some(c) = self.input.as_bytes().get(self.position) {
            if !(c.is_ascii_alphanumeric() || *c == b'_') {
                break;
            }
            self.position += 1;
        }

        let read = &self.input[start..self.position];

        match TERMINALS.lookup_keyword(read) {
            Some(kind) => self.tokens.push(Token::new(kind, read, span)),
            None => self.tokens.push(Token::new(TokenKind::Name, read, span)),
        }
    }

    fn lex_numeric(&mut self) {
        let start = self.position;
        let span = self.span();

        while let Some(c) = self.input.as_bytes().get(self.position) {
            if !c.is_ascii_digit() {
                break;
            }
            self.position += 1;
        }

        if self.input.as_bytes().get(self.position) == Some(&b'.') {
            self.position += 1;
            while let Some(c) = self.input.as_bytes().get(self.position) {
                if !c.is_ascii_digit() {
                    break;
                }
                self.position += 1;
            }
            let read = &self.input[start..self.position];
            self.tokens.push(Token::new(TokenKind::Float, read, span));
        } else {
            let read = &self.input[start..self.position];
            self.tokens.push(Token::new(TokenKind::Integer, read, span));
        }
    }

    /// Scan a character literal: a single character or a two-character escape
    /// between single quotes. The lexeme keeps its quotes; decoding the escape
    /// happens at evaluation.
    fn lex_character(&mut self) {
        let start = self.position;
        let span = self.span();

        // opening quote
        self.position += 1;

        match self.input.as_bytes().get(self.position) {
            None | Some(b'\n') => {
                self.error("unterminated character literal");
                return;
            }
            Some(b'\\') => {
                self.position += 1;
                match self.input[self.position..].chars().next() {
                    Some(c) => self.position += c.len_utf8(),
                    None => {
                        self.error("unterminated character literal");
                        return;
                    }
                }
            }
            Some(_) => {
                let c = self.input[self.position..].chars().next().unwrap_or('\0');
                self.position += c.len_utf8();
            }
        }

        if self.input.as_bytes().get(self.position) == Some(&b'\'') {
            self.position += 1;
            let read = &self.input[start..self.position];
            self.tokens.push(Token::new(TokenKind::Char, read, span));
        } else {
            self.error("unterminated character literal");
        }
    }

    /// Scan an operator or punctuation symbol. The table hands back the
    /// longest match, so two-character operators always beat their
    /// one-character prefixes.
    fn lex_special(&mut self) {
        let start = self.position;
        let span = self.span();

        match TERMINALS.match_operator(&self.input[start..]) {
            Some((len, kind)) => {
                self.tokens
                    .push(Token::new(kind, &self.input[start..start + len], span));
                self.position = start + len;
            }
            None => {
                let c = self.input[start..].chars().next().unwrap_or('\0');
                self.error(format!("illegal character {c:?}"));
                self.position = start + c.len_utf8();
            }
        }
    }
}
