//! The fixed rule chain a box file must follow
//!
//! Every descriptor is an immutable static that names the expected token kind,
//! optionally an exact value, and the descriptor that follows it. The chain is
//! `package <identifier> <identifier>`.

use crate::tokens::TokenKind;
use std::fmt;

/// One expected token in the rule chain
#[derive(Debug, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub kind: TokenKind,
    /// `None` accepts any value of `kind`
    pub value: Option<&'static str>,
    /// `None` marks the terminal descriptor
    pub next: Option<&'static RuleDescriptor>,
}

impl RuleDescriptor {
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// Iterate from this descriptor to the end of its chain
    pub fn iter(&'static self) -> RuleIter {
        RuleIter {
            current: Some(self),
        }
    }
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}(\"{}\")", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

pub struct RuleIter {
    current: Option<&'static RuleDescriptor>,
}

impl Iterator for RuleIter {
    type Item = &'static RuleDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let rule = self.current?;
        self.current = rule.next;
        Some(rule)
    }
}

static PACKAGE_QUALIFIER: RuleDescriptor = RuleDescriptor {
    kind: TokenKind::Identifier,
    value: None,
    next: None,
};

static PACKAGE_NAME: RuleDescriptor = RuleDescriptor {
    kind: TokenKind::Identifier,
    value: None,
    next: Some(&PACKAGE_QUALIFIER),
};

/// Head of the chain: `package <identifier> <identifier>`
pub static PACKAGE_DECLARATION: RuleDescriptor = RuleDescriptor {
    kind: TokenKind::Keyword,
    value: Some("package"),
    next: Some(&PACKAGE_NAME),
};

/// Number of tokens in one complete declaration
pub fn declaration_length() -> usize {
    PACKAGE_DECLARATION.iter().count()
}
