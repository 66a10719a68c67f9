//! Lexical analysis for box source
//!
//! [`RuneReader`] decodes bytes into runes and [`Scanner`] turns runes into
//! classified tokens with line, column and character index.

pub mod analyzer;
pub mod reader;

use crate::config::compile_time::lexical::*;
use crate::logging::codes;
use crate::tokens::TokenStream;

pub use analyzer::{LexerError, LexicalMetrics, Scanner};
pub use reader::RuneReader;

/// Scan a string with default preferences
pub fn tokenize_str(source: &str) -> Result<TokenStream, LexerError> {
    Scanner::new().scan_str(source)
}

/// Check lexical codes and limits at startup
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    codes::ensure_registered(&[
        codes::lexical::READ_FAILURE,
        codes::lexical::WORD_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
        codes::success::TOKENIZATION_COMPLETE,
    ])?;

    if MAX_WORD_LENGTH == 0 || MAX_TOKEN_COUNT == 0 {
        return Err("Lexical limits must be greater than zero".to_string());
    }

    crate::log_debug!("Lexical security limits initialized",
        "max_word_length" => MAX_WORD_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    #[test]
    fn test_init_validation() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_tokenize_str() {
        let stream = tokenize_str("export class Foo: Bar {}").unwrap();
        assert_eq!(stream.len(), 7);
        assert_eq!(stream.count_kind(TokenKind::Keyword), 2);
        assert_eq!(stream.count_kind(TokenKind::Operator), 1);
        assert_eq!(stream.count_kind(TokenKind::Separator), 2);
    }
}
