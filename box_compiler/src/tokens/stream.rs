//! In-memory token stream with a forward cursor
//!
//! The file pipeline validates tokens as they are scanned and never buffers
//! them; this stream serves whole-string scanning, dump decoding and tests.

use super::token::{Token, TokenKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Token after the current one
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    /// Return the current token and move past it
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining_count(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind() == kind).count()
    }

    /// Debug summary of the cursor and its neighborhood
    pub fn diagnostic(&self) -> String {
        let current = self
            .current()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "<end>".to_string());

        format!(
            "TokenStream: {}/{} consumed, current: {}",
            self.position,
            self.tokens.len(),
            current
        )
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned()?;
        self.position += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;
    use crate::utils::Position;

    fn sample() -> TokenStream {
        TokenStream::new(vec![
            Token::keyword(Keyword::Package, Position::new(0, 1, 1)),
            Token::identifier("foo", Position::new(8, 1, 9)),
        ])
    }

    #[test]
    fn test_cursor_movement() {
        let mut stream = sample();
        assert_eq!(stream.current().map(|t| t.value()), Some("package"));
        assert_eq!(stream.peek().map(|t| t.value()), Some("foo"));

        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
        assert!(stream.advance().is_none());
        assert_eq!(stream.remaining_count(), 0);

        stream.reset();
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_iteration_and_counts() {
        let stream = sample();
        assert_eq!(stream.count_kind(TokenKind::Identifier), 1);
        assert!(stream.diagnostic().contains("0/2"));

        let values: Vec<String> = stream.map(|t| t.value().to_string()).collect();
        assert_eq!(values, vec!["package", "foo"]);
    }
}
