//! Classified lexical tokens
//!
//! A token is built once by the scanner at a boundary event and never changes
//! afterwards. The dump tag is derived from [`TokenKind`] on demand.
use crate::grammar::keywords::{Keyword, Operator, Separator};
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four token categories of the box language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Operator,
    Separator,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Identifier => "Identifier",
            Self::Operator => "Operator",
            Self::Separator => "Separator",
        }
    }

    /// Numeric tag used in the token dump
    pub const fn dump_tag(self) -> u8 {
        match self {
            Self::Keyword => 0,
            Self::Identifier => 1,
            Self::Operator => 2,
            Self::Separator => 3,
        }
    }

    pub const fn from_dump_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Keyword),
            1 => Some(Self::Identifier),
            2 => Some(Self::Operator),
            3 => Some(Self::Separator),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified token with the position of its first rune
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    value: String,
    position: Position,
}

impl Token {
    pub fn keyword(keyword: Keyword, position: Position) -> Self {
        Self {
            kind: TokenKind::Keyword,
            value: keyword.as_str().to_string(),
            position,
        }
    }

    pub fn identifier(name: impl Into<String>, position: Position) -> Self {
        Self {
            kind: TokenKind::Identifier,
            value: name.into(),
            position,
        }
    }

    pub fn operator(operator: Operator, position: Position) -> Self {
        Self {
            kind: TokenKind::Operator,
            value: operator.as_char().to_string(),
            position,
        }
    }

    pub fn separator(separator: Separator, position: Position) -> Self {
        Self {
            kind: TokenKind::Separator,
            value: separator.as_char().to_string(),
            position,
        }
    }

    /// Resolve an accumulated word: reserved words become keywords
    pub fn from_word(word: String, position: Position) -> Self {
        match Keyword::from_word(&word) {
            Some(keyword) => Self::keyword(keyword, position),
            None => Self::identifier(word, position),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// 0-based character index of the first rune
    pub fn index(&self) -> usize {
        self.position.index
    }

    pub fn span(&self) -> Span {
        Span::on_line(self.position, self.value.chars().count())
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword => Keyword::from_word(&self.value),
            _ => None,
        }
    }

    /// Payload written after the tag and index in a dump record
    pub fn dump_payload(&self) -> String {
        match self.kind {
            TokenKind::Keyword => self
                .as_keyword()
                .map(|keyword| keyword.id().to_string())
                .unwrap_or_else(|| self.value.clone()),
            TokenKind::Identifier | TokenKind::Operator | TokenKind::Separator => {
                self.value.clone()
            }
        }
    }

    /// The progress line printed for each accepted token
    pub fn classification_line(&self) -> String {
        format!(
            "Line: {}, Offset: {}, Type: {}, Value: {}",
            self.line(),
            self.column(),
            self.kind,
            self.value
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) at {}", self.kind, self.value, self.position)
    }
}
