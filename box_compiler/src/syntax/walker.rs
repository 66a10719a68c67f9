//! Sequential rule chain walker
//!
//! One walker belongs to one validation session. It holds a cursor into the
//! static rule chain and checks each token against the descriptor under the
//! cursor. After the terminal descriptor accepts a token the cursor is
//! exhausted, and the next token restarts the chain from its head, so the
//! declaration pattern repeats across the stream.

use super::error::{SyntaxError, SyntaxResult};
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::rules::{RuleDescriptor, PACKAGE_DECLARATION};
use crate::logging::codes;
use crate::tokens::Token;
use crate::utils::Position;
use crate::{log_debug, log_error, log_success};

/// Current place in the rule chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    At(&'static RuleDescriptor),
    /// The terminal descriptor has accepted; the next token restarts the chain
    Exhausted,
}

/// Outcome of one accepted token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Matched a descriptor inside the declaration
    Partial,
    /// Matched the terminal descriptor, completing a declaration
    Declaration,
}

/// Where the session stands, for telling "still in progress" from "accepted"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerStatus {
    /// No token offered yet
    Idle,
    /// Mid-declaration: `matched` tokens accepted, `expected` comes next
    InProgress {
        matched: usize,
        expected: &'static RuleDescriptor,
    },
    /// The last offered token completed a declaration
    Accepted { declarations: usize },
}

pub struct RuleWalker {
    head: &'static RuleDescriptor,
    cursor: Cursor,
    matched: usize,
    declarations: usize,
    tokens_seen: usize,
    last_position: Option<Position>,
    preferences: SyntaxPreferences,
}

impl RuleWalker {
    pub fn new() -> Self {
        Self::with_preferences(SyntaxPreferences::default())
    }

    pub fn with_preferences(preferences: SyntaxPreferences) -> Self {
        Self::with_chain(&PACKAGE_DECLARATION, preferences)
    }

    pub fn with_chain(head: &'static RuleDescriptor, preferences: SyntaxPreferences) -> Self {
        Self {
            head,
            cursor: Cursor::At(head),
            matched: 0,
            declarations: 0,
            tokens_seen: 0,
            last_position: None,
            preferences,
        }
    }

    /// Check one token against the descriptor under the cursor
    pub fn validate(&mut self, token: &Token) -> SyntaxResult<Acceptance> {
        let rule = match self.cursor {
            Cursor::At(rule) => rule,
            Cursor::Exhausted => {
                self.cursor = Cursor::At(self.head);
                self.head
            }
        };
        self.tokens_seen += 1;

        if token.kind() != rule.kind {
            return Err(self.reject(SyntaxError::KindMismatch {
                expected_kind: rule.kind,
                expected_value: rule.value,
                found_kind: token.kind(),
                found_value: token.value().to_string(),
                position: token.position(),
            }));
        }

        if let Some(expected) = rule.value {
            if token.value() != expected {
                return Err(self.reject(SyntaxError::ValueMismatch {
                    expected,
                    found: token.value().to_string(),
                    position: token.position(),
                }));
            }
        }

        self.matched += 1;
        self.last_position = Some(token.position());

        if self.preferences.report_accepted_tokens {
            log_success!(
                codes::success::TOKEN_ACCEPTED,
                &token.classification_line(),
                "line" => token.line(),
                "column" => token.column(),
                "kind" => token.kind(),
                "value" => token.value()
            );
        }

        match rule.next {
            Some(next) => {
                self.cursor = Cursor::At(next);
                Ok(Acceptance::Partial)
            }
            None => {
                self.cursor = Cursor::Exhausted;
                self.matched = 0;
                self.declarations += 1;
                if self.preferences.report_accepted_tokens {
                    log_success!(
                        codes::success::DECLARATION_ACCEPTED,
                        "Declaration accepted",
                        "count" => self.declarations,
                        "line" => token.line()
                    );
                } else {
                    log_debug!("Declaration accepted", "count" => self.declarations);
                }
                Ok(Acceptance::Declaration)
            }
        }
    }

    pub fn status(&self) -> WalkerStatus {
        if self.tokens_seen == 0 {
            return WalkerStatus::Idle;
        }

        match self.cursor {
            Cursor::Exhausted => WalkerStatus::Accepted {
                declarations: self.declarations,
            },
            Cursor::At(expected) => WalkerStatus::InProgress {
                matched: self.matched,
                expected,
            },
        }
    }

    /// Close the session and return the number of complete declarations
    pub fn finish(&self) -> SyntaxResult<usize> {
        let outcome = match self.status() {
            WalkerStatus::Idle => Err(SyntaxError::EmptyTokenStream),
            WalkerStatus::InProgress { matched, expected }
                if self.preferences.require_complete_declaration =>
            {
                Err(SyntaxError::IncompleteDeclaration {
                    expected: expected.to_string(),
                    matched,
                    position: self.last_position.unwrap_or_else(Position::start),
                })
            }
            WalkerStatus::InProgress { .. } | WalkerStatus::Accepted { .. } => {
                Ok(self.declarations)
            }
        };

        match &outcome {
            Ok(declarations) => {
                log_success!(
                    codes::success::SYNTAX_VALIDATION_PASSED,
                    "Rule chain validation passed",
                    "declarations" => declarations,
                    "tokens" => self.tokens_seen
                );
            }
            Err(error) => match error.span() {
                Some(span) => log_error!(error.error_code(), &error.to_string(), span = span),
                None => log_error!(error.error_code(), &error.to_string()),
            },
        }

        outcome
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn declarations(&self) -> usize {
        self.declarations
    }

    pub fn tokens_seen(&self) -> usize {
        self.tokens_seen
    }

    fn reject(&self, error: SyntaxError) -> SyntaxError {
        let expected = match self.cursor {
            Cursor::At(rule) => rule.to_string(),
            Cursor::Exhausted => self.head.to_string(),
        };

        match error.span() {
            Some(span) => log_error!(error.error_code(), &error.to_string(),
                span = span,
                "expected" => expected
            ),
            None => log_error!(error.error_code(), &error.to_string(),
                "expected" => expected
            ),
        }
        error
    }
}

impl Default for RuleWalker {
    fn default() -> Self {
        Self::new()
    }
}
