//! Rule chain validation errors with logging code mapping

use crate::logging::{codes, Code};
use crate::tokens::TokenKind;
use crate::utils::{Position, Span};

pub type SyntaxResult<T> = Result<T, SyntaxError>;

fn describe_expected(kind: &TokenKind, value: &Option<&'static str>) -> String {
    match value {
        Some(value) => format!("{}(\"{}\")", kind, value),
        None => kind.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error(
        "Expected {}, found {found_kind}(\"{found_value}\") at {position}",
        describe_expected(.expected_kind, .expected_value)
    )]
    KindMismatch {
        expected_kind: TokenKind,
        expected_value: Option<&'static str>,
        found_kind: TokenKind,
        found_value: String,
        position: Position,
    },

    #[error("Expected \"{expected}\", found \"{found}\" at {position}")]
    ValueMismatch {
        expected: &'static str,
        found: String,
        position: Position,
    },

    #[error("Incomplete declaration: expected {expected} after {matched} matched token(s), input ended at {position}")]
    IncompleteDeclaration {
        expected: String,
        matched: usize,
        /// Position of the last accepted token
        position: Position,
    },

    #[error("Empty token stream - expected a package declaration")]
    EmptyTokenStream,
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::KindMismatch { .. } => codes::syntax::KIND_MISMATCH,
            Self::ValueMismatch { .. } => codes::syntax::VALUE_MISMATCH,
            Self::IncompleteDeclaration { .. } => codes::syntax::INCOMPLETE_DECLARATION,
            Self::EmptyTokenStream => codes::syntax::EMPTY_TOKEN_STREAM,
        }
    }

    /// Line and column of the offending token, if the error has one
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::KindMismatch { position, .. }
            | Self::ValueMismatch { position, .. }
            | Self::IncompleteDeclaration { position, .. } => Some(*position),
            Self::EmptyTokenStream => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::KindMismatch {
                found_value,
                position,
                ..
            }
            | Self::ValueMismatch {
                found: found_value,
                position,
                ..
            } => Some(Span::on_line(*position, found_value.chars().count())),
            Self::IncompleteDeclaration { position, .. } => Some(Span::on_line(*position, 0)),
            Self::EmptyTokenStream => None,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mismatch_message() {
        let error = SyntaxError::KindMismatch {
            expected_kind: TokenKind::Keyword,
            expected_value: Some("package"),
            found_kind: TokenKind::Identifier,
            found_value: "import".to_string(),
            position: Position::new(0, 1, 1),
        };

        assert_eq!(
            error.to_string(),
            "Expected Keyword(\"package\"), found Identifier(\"import\") at 1:1"
        );
        assert_eq!(error.error_code(), codes::syntax::KIND_MISMATCH);
        assert_eq!(error.span().map(|s| s.len()), Some(6));
        assert_eq!(error.category(), "Syntax");
    }

    #[test]
    fn test_identifier_expectation_has_no_value() {
        let error = SyntaxError::KindMismatch {
            expected_kind: TokenKind::Identifier,
            expected_value: None,
            found_kind: TokenKind::Separator,
            found_value: ";".to_string(),
            position: Position::new(7, 1, 8),
        };
        assert!(error.to_string().starts_with("Expected Identifier, found Separator"));
    }

    #[test]
    fn test_positions() {
        assert_eq!(SyntaxError::EmptyTokenStream.position(), None);
        assert!(SyntaxError::EmptyTokenStream.requires_halt());

        let incomplete = SyntaxError::IncompleteDeclaration {
            expected: "Identifier".to_string(),
            matched: 2,
            position: Position::new(8, 1, 9),
        };
        assert_eq!(incomplete.position().map(|p| p.column), Some(9));
        assert_eq!(incomplete.error_code().as_str(), "E040");
    }
}
