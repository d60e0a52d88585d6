use std::collections::HashMap;

use super::TokenKind;

/// Everything the lexer matches verbatim, split by how it is scanned:
/// reserved words are resolved after an identifier-shaped lexeme has been
/// read in full, while operators and punctuation are matched against the
/// front of the remaining input. The operator list stays sorted longest
/// first, which is all that is needed for `<=` to win over `<`.
#[derive(Debug, Clone, Default)]
pub struct TerminalTable {
    keywords: HashMap<&'static str, TokenKind>,
    operators: Vec<(&'static str, TokenKind)>,
}

impl TerminalTable {
    pub fn keyword(&mut self, word: &'static str, kind: TokenKind) {
        self.keywords.insert(word, kind);
    }

    pub fn operator(&mut self, symbol: &'static str, kind: TokenKind) {
        self.operators.push((symbol, kind));
        self.operators
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
    }

    /// Resolve an identifier-shaped lexeme to a reserved word, if it is one.
    pub fn lookup_keyword(&self, word: &str) -> Option<TokenKind> {
        self.keywords.get(word).copied()
    }

    /// The longest operator sitting at the front of `rest`, together with
    /// its byte length.
    pub fn match_operator(&self, rest: &str) -> Option<(usize, TokenKind)> {
        self.operators
            .iter()
            .find(|(symbol, _)| rest.starts_with(symbol))
            .map(|(symbol, kind)| (symbol.len(), *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TerminalTable {
        let mut t = TerminalTable::default();
        t.operator("<", TokenKind::LessThan);
        t.operator("<=", TokenKind::LessOrEqual);
        t.keyword("while", TokenKind::While);
        t
    }

    #[test]
    fn test_longer_operators_win() {
        let t = table();
        assert_eq!(t.match_operator("<= 1"), Some((2, TokenKind::LessOrEqual)));
        assert_eq!(t.match_operator("< 1"), Some((1, TokenKind::LessThan)));
        assert_eq!(t.match_operator("@"), None);
    }

    #[test]
    fn test_keywords_are_exact_matches() {
        let t = table();
        assert_eq!(t.lookup_keyword("while"), Some(TokenKind::While));
        assert_eq!(t.lookup_keyword("whiles"), None);
    }
}
