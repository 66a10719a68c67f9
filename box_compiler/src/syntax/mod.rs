//! Syntax validation - walking tokens against the package rule chain
//!
//! Validation is fail-fast: the first token that does not match the
//! descriptor under the cursor ends the session with a positioned error.

mod error;
mod walker;

pub use error::{SyntaxError, SyntaxResult};
pub use walker::{Acceptance, Cursor, RuleWalker, WalkerStatus};

use crate::config::runtime::SyntaxPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::log_debug;

/// Validate a complete token stream and return the declaration count
pub fn validate_stream(stream: TokenStream) -> SyntaxResult<usize> {
    validate_stream_with_preferences(stream, SyntaxPreferences::default())
}

pub fn validate_stream_with_preferences(
    stream: TokenStream,
    preferences: SyntaxPreferences,
) -> SyntaxResult<usize> {
    log_debug!("Starting rule chain validation", "tokens" => stream.len());

    let mut walker = RuleWalker::with_preferences(preferences);
    for token in stream {
        walker.validate(&token)?;
    }
    walker.finish()
}

/// Initialize syntax module logging validation
pub fn init_syntax_logging() -> Result<(), String> {
    codes::ensure_registered(&[
        codes::syntax::KIND_MISMATCH,
        codes::syntax::VALUE_MISMATCH,
        codes::syntax::INCOMPLETE_DECLARATION,
        codes::syntax::EMPTY_TOKEN_STREAM,
        codes::success::TOKEN_ACCEPTED,
        codes::success::SYNTAX_VALIDATION_PASSED,
    ])
}
