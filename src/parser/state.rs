use crate::lexer::{Span, Token, TokenKind};

use super::ParseError;

/// Struct for walking the token stream with a single token of lookahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Check whether the next token has the given kind.
    pub fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().map(|token| token.kind == kind).unwrap_or(false)
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    /// Consume the next token iff it has the given kind.
    pub fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind(kind) {
            return self.next();
        }
        None
    }

    /// Consume the next token, requiring it to have the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.tokens.get(self.index) {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.index += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError {
                message: format!("expected {}, found {}", kind, token.kind),
                position: Some(token.span.clone()),
            }),
            None => Err(ParseError::eof(&format!("{kind}"))),
        }
    }

    /// Span of the token the parser is currently looking at.
    pub fn span(&self) -> Span {
        self.peek().map(|token| token.span.clone()).unwrap_or_default()
    }

    /// Get the current index.
    pub fn get_index(&self) -> usize {
        self.index
    }

    /// Set the index of this "iterator".
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl From<Vec<Token>> for ParseState {
    fn from(value: Vec<Token>) -> Self {
        Self::new(value)
    }
}
