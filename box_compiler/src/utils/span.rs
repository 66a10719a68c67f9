//! Source location tracking for the box compiler
//!
//! Positions are counted in characters (runes), not bytes: the scanner works
//! on decoded runes and the token dump records character indices.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text.
///
/// `column` follows the scanner's convention: it is incremented before a
/// rune is classified, so the first rune on a line sits at column 1 and a
/// newline resets it to 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Character index from start of input (0-based)
    pub index: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based once a rune has been read on the line)
    pub column: u32,
}

impl Position {
    pub fn new(index: usize, line: u32, column: u32) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// Position before any rune has been read: line 1, column 0, index 0
    pub fn start() -> Self {
        Self {
            index: 0,
            line: 1,
            column: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.index <= end.index, "Span start must not be after end");
        Self { start, end }
    }

    /// Span covering `len` runes on a single line starting at `start`
    pub fn on_line(start: Position, len: usize) -> Self {
        let end = Position {
            index: start.index + len,
            line: start.line,
            column: start.column + len as u32,
        };
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Number of runes covered
    pub fn len(&self) -> usize {
        self.end.index - self.start.index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}:{}", self.start.line, self.start.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
