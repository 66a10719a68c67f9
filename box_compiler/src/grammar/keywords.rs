//! Classification tables for the box language
//!
//! Reserved words map to keywords; single characters map to operators or
//! separators. The operator and separator sets are disjoint, and every entry
//! carries the numeric id used by the token dump.
use serde::{Deserialize, Serialize};

/// Reserved words, matched exactly and case-sensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Package,
    Export,
    Class,
    Interface,
    Implements,
    Private,
    Public,
    Int,
    String,
    Bool,
}

impl Keyword {
    pub const ALL: [Keyword; 10] = [
        Self::Package,
        Self::Export,
        Self::Class,
        Self::Interface,
        Self::Implements,
        Self::Private,
        Self::Public,
        Self::Int,
        Self::String,
        Self::Bool,
    ];

    /// Canonical spelling in box source
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Export => "export",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Implements => "implements",
            Self::Private => "private",
            Self::Public => "public",
            Self::Int => "int",
            Self::String => "string",
            Self::Bool => "bool",
        }
    }

    /// Numeric id written to token dumps
    pub const fn id(self) -> u8 {
        match self {
            Self::Package => 0,
            Self::Export => 1,
            Self::Class => 2,
            Self::Interface => 3,
            Self::Implements => 4,
            Self::Private => 5,
            Self::Public => 6,
            Self::Int => 7,
            Self::String => 8,
            Self::Bool => 9,
        }
    }

    /// Exact match only: `Package` and `PACKAGE` are identifiers
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "package" => Some(Self::Package),
            "export" => Some(Self::Export),
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "implements" => Some(Self::Implements),
            "private" => Some(Self::Private),
            "public" => Some(Self::Public),
            "int" => Some(Self::Int),
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.id() == id)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single-character operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Colon,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Colon,
    ];

    pub const fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Star => '*',
            Self::Slash => '/',
            Self::Colon => ':',
        }
    }

    pub const fn id(self) -> u8 {
        match self {
            Self::Plus => 0,
            Self::Minus => 1,
            Self::Star => 2,
            Self::Slash => 3,
            Self::Colon => 4,
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Star),
            '/' => Some(Self::Slash),
            ':' => Some(Self::Colon),
            _ => None,
        }
    }
}

/// Single-character separators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    OpenBrace,
    CloseBrace,
    Semicolon,
}

impl Separator {
    pub const ALL: [Separator; 3] = [Self::OpenBrace, Self::CloseBrace, Self::Semicolon];

    pub const fn as_char(self) -> char {
        match self {
            Self::OpenBrace => '{',
            Self::CloseBrace => '}',
            Self::Semicolon => ';',
        }
    }

    pub const fn id(self) -> u8 {
        match self {
            Self::OpenBrace => 0,
            Self::CloseBrace => 1,
            Self::Semicolon => 2,
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '{' => Some(Self::OpenBrace),
            '}' => Some(Self::CloseBrace),
            ';' => Some(Self::Semicolon),
            _ => None,
        }
    }
}

/// Check if a word is reserved
pub fn is_reserved_keyword(word: &str) -> bool {
    Keyword::from_word(word).is_some()
}

pub fn is_operator_char(c: char) -> bool {
    Operator::from_char(c).is_some()
}

pub fn is_separator_char(c: char) -> bool {
    Separator::from_char(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_ids_match_declaration_order() {
        for (expected, keyword) in Keyword::ALL.iter().enumerate() {
            assert_eq!(keyword.id() as usize, expected);
            assert_eq!(Keyword::from_id(keyword.id()), Some(*keyword));
            assert_eq!(Keyword::from_word(keyword.as_str()), Some(*keyword));
        }
        assert_eq!(Keyword::from_id(10), None);
    }

    #[test]
    fn test_keyword_matching_is_case_sensitive() {
        assert!(is_reserved_keyword("package"));
        assert!(!is_reserved_keyword("Package"));
        assert!(!is_reserved_keyword("PACKAGE"));
        assert!(!is_reserved_keyword("packages"));
        assert!(!is_reserved_keyword(""));
    }

    #[test]
    fn test_operator_table() {
        let chars: String = Operator::ALL.iter().map(|op| op.as_char()).collect();
        assert_eq!(chars, "+-*/:");
        for op in Operator::ALL {
            assert_eq!(Operator::from_char(op.as_char()), Some(op));
        }
        assert_eq!(Operator::Colon.id(), 4);
    }

    #[test]
    fn test_separator_table() {
        assert_eq!(Separator::from_char('{'), Some(Separator::OpenBrace));
        assert_eq!(Separator::from_char('}'), Some(Separator::CloseBrace));
        assert_eq!(Separator::from_char(';').map(|s| s.id()), Some(2));
        assert_eq!(Separator::from_char('('), None);
    }

    #[test]
    fn test_operators_and_separators_are_disjoint() {
        for op in Operator::ALL {
            assert!(!is_separator_char(op.as_char()));
        }
        for sep in Separator::ALL {
            assert!(!is_operator_char(sep.as_char()));
        }
    }
}
