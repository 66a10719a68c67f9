//! Rune-at-a-time scanner with source position tracking
//!
//! The scanner keeps a pending word buffer and emits a token at every
//! boundary: whitespace, an operator, a separator or end of input. Tokens are
//! handed to a caller-supplied sink as soon as they are complete, so scanning
//! and validation can run in lock step.

use super::reader::RuneReader;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::keywords::{Operator, Separator};
use crate::logging::codes;
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use std::io::{self, BufRead};
use unicode_general_category::{get_general_category, GeneralCategory};

/// Lexical analysis errors with compile-time security boundaries
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    #[error("Failed to read source at character {index}: {source}")]
    Io {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("Word too long at {position}: more than {MAX_WORD_LENGTH} characters")]
    WordTooLong { position: Position },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Io { .. } => codes::lexical::READ_FAILURE,
            LexerError::WordTooLong { .. } => codes::lexical::WORD_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }
}

/// Counters collected while scanning one input
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub operator_tokens: usize,
    pub separator_tokens: usize,
    pub runes_read: usize,
    pub lines: u32,

    // Only collected with `collect_detailed_metrics`
    pub skipped_runes: usize,
    pub discarded_digits: usize,
    pub longest_word: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token.kind() {
            TokenKind::Keyword => self.keyword_tokens += 1,
            TokenKind::Identifier => self.identifier_tokens += 1,
            TokenKind::Operator => self.operator_tokens += 1,
            TokenKind::Separator => self.separator_tokens += 1,
        }
    }
}

/// Streaming scanner for box source
pub struct Scanner {
    /// Position of the rune about to be read; `column` is pre-increment
    position: Position,
    word: String,
    word_len: usize,
    word_start: Position,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            position: Position::start(),
            word: String::new(),
            word_len: 0,
            word_start: Position::start(),
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Classify one rune, emitting zero, one or two tokens into `sink`
    pub fn push<E, F>(&mut self, rune: char, sink: &mut F) -> Result<(), E>
    where
        E: From<LexerError>,
        F: FnMut(Token) -> Result<(), E>,
    {
        self.position.column += 1;
        let here = self.position;

        if let Some(separator) = Separator::from_char(rune) {
            self.flush(sink)?;
            self.emit(Token::separator(separator, here), sink)?;
        } else if let Some(operator) = Operator::from_char(rune) {
            self.flush(sink)?;
            self.emit(Token::operator(operator, here), sink)?;
        } else if is_letter(rune) {
            if self.word.is_empty() {
                self.word_start = here;
            }
            self.append(rune)?;
        } else if rune.is_whitespace() {
            self.flush(sink)?;
            if rune == '\n' {
                self.position.column = 0;
                self.position.line += 1;
            }
        } else if rune.is_numeric() {
            if self.word.is_empty() {
                if self.preferences.collect_detailed_metrics {
                    self.metrics.discarded_digits += 1;
                }
            } else {
                self.append(rune)?;
            }
        } else if self.preferences.collect_detailed_metrics {
            self.metrics.skipped_runes += 1;
        }

        self.position.index += 1;
        self.metrics.runes_read += 1;
        Ok(())
    }

    /// Flush the trailing word and return the metrics for this input
    pub fn finish<E, F>(&mut self, sink: &mut F) -> Result<LexicalMetrics, E>
    where
        E: From<LexerError>,
        F: FnMut(Token) -> Result<(), E>,
    {
        self.flush(sink)?;
        self.metrics.lines = self.position.line;

        log_success!(
            codes::success::TOKENIZATION_COMPLETE,
            "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "runes" => self.metrics.runes_read,
            "lines" => self.metrics.lines
        );

        Ok(self.metrics.clone())
    }

    /// Drive the scanner over a rune reader until end of stream
    pub fn scan_reader<R, E, F>(
        &mut self,
        reader: &mut RuneReader<R>,
        sink: &mut F,
    ) -> Result<LexicalMetrics, E>
    where
        R: BufRead,
        E: From<LexerError>,
        F: FnMut(Token) -> Result<(), E>,
    {
        loop {
            match reader.read_rune() {
                Ok(Some(rune)) => self.push(rune, sink)?,
                Ok(None) => break,
                Err(source) => {
                    let error = LexerError::Io {
                        index: self.position.index,
                        source,
                    };
                    log_error!(error.error_code(), &error.to_string(),
                        "index" => self.position.index
                    );
                    return Err(error.into());
                }
            }
        }

        self.finish(sink)
    }

    /// Scan a whole string into a token stream
    pub fn scan_str(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        let mut tokens = Vec::new();
        let mut sink = |token: Token| -> Result<(), LexerError> {
            tokens.push(token);
            Ok(())
        };

        for rune in source.chars() {
            self.push(rune, &mut sink)?;
        }
        self.finish(&mut sink)?;

        Ok(TokenStream::new(tokens))
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    fn append(&mut self, rune: char) -> Result<(), LexerError> {
        if self.word_len >= MAX_WORD_LENGTH {
            let error = LexerError::WordTooLong {
                position: self.word_start,
            };
            log_error!(error.error_code(), "Word exceeds maximum length",
                span = Span::on_line(self.word_start, self.word_len),
                "limit" => MAX_WORD_LENGTH
            );
            return Err(error);
        }

        self.word.push(rune);
        self.word_len += 1;
        Ok(())
    }

    /// Resolve the pending word, if any, into a keyword or identifier
    fn flush<E, F>(&mut self, sink: &mut F) -> Result<(), E>
    where
        E: From<LexerError>,
        F: FnMut(Token) -> Result<(), E>,
    {
        if self.word.is_empty() {
            return Ok(());
        }

        if self.preferences.collect_detailed_metrics {
            self.metrics.longest_word = self.metrics.longest_word.max(self.word_len);
        }

        let word = std::mem::take(&mut self.word);
        self.word_len = 0;
        self.emit(Token::from_word(word, self.word_start), sink)
    }

    fn emit<E, F>(&mut self, token: Token, sink: &mut F) -> Result<(), E>
    where
        E: From<LexerError>,
        F: FnMut(Token) -> Result<(), E>,
    {
        if self.metrics.total_tokens >= MAX_TOKEN_COUNT {
            let error = LexerError::TooManyTokens {
                count: self.metrics.total_tokens + 1,
            };
            log_error!(error.error_code(), "Token limit exceeded",
                span = token.span(),
                "limit" => MAX_TOKEN_COUNT
            );
            return Err(error.into());
        }

        if self.preferences.log_token_classification {
            log_debug!("Classified token",
                "kind" => token.kind(),
                "value" => token.value(),
                "position" => token.position()
            );
        }

        self.metrics.record_token(&token);
        sink(token)
    }
}

/// General category L*; number letters and combining marks are not letters
fn is_letter(rune: char) -> bool {
    rune.is_ascii_alphabetic()
        || matches!(
            get_general_category(rune),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
        )
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;
    use assert_matches::assert_matches;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new().scan_str(source).unwrap().into_tokens()
    }

    fn summary(tokens: &[Token]) -> Vec<(TokenKind, &str, u32, u32, usize)> {
        tokens
            .iter()
            .map(|t| (t.kind(), t.value(), t.line(), t.column(), t.index()))
            .collect()
    }

    #[test]
    fn test_package_declaration_positions() {
        let tokens = scan("package foo bar");
        assert_eq!(
            summary(&tokens),
            vec![
                (TokenKind::Keyword, "package", 1, 1, 0),
                (TokenKind::Identifier, "foo", 1, 9, 8),
                (TokenKind::Identifier, "bar", 1, 13, 12),
            ]
        );
        assert_eq!(tokens[0].as_keyword(), Some(Keyword::Package));
    }

    #[test]
    fn test_keyword_match_is_exact() {
        let tokens = scan("Package packages int");
        assert_eq!(tokens[0].kind(), TokenKind::Identifier);
        assert_eq!(tokens[1].kind(), TokenKind::Identifier);
        assert_eq!(tokens[2].kind(), TokenKind::Keyword);
    }

    #[test]
    fn test_operators_and_separators_split_words() {
        let tokens = scan("a+b{c};");
        assert_eq!(
            summary(&tokens),
            vec![
                (TokenKind::Identifier, "a", 1, 1, 0),
                (TokenKind::Operator, "+", 1, 2, 1),
                (TokenKind::Identifier, "b", 1, 3, 2),
                (TokenKind::Separator, "{", 1, 4, 3),
                (TokenKind::Identifier, "c", 1, 5, 4),
                (TokenKind::Separator, "}", 1, 6, 5),
                (TokenKind::Separator, ";", 1, 7, 6),
            ]
        );
    }

    #[test]
    fn test_digits_join_words_only_after_letters() {
        let tokens = scan("x1y2 42 9lives");
        let values: Vec<&str> = tokens.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec!["x1y2", "lives"]);
        assert_eq!(tokens[1].column(), 10);
    }

    #[test]
    fn test_newline_resets_column_after_flush() {
        let tokens = scan("package\nfoo\n  bar");
        assert_eq!(
            summary(&tokens),
            vec![
                (TokenKind::Keyword, "package", 1, 1, 0),
                (TokenKind::Identifier, "foo", 2, 1, 8),
                (TokenKind::Identifier, "bar", 3, 3, 14),
            ]
        );
    }

    #[test]
    fn test_unclassified_runes_are_skipped_without_flushing() {
        // '.' is neither operator, separator, letter, digit nor whitespace
        let tokens = scan("ab.cd #x");
        let values: Vec<&str> = tokens.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec!["abcd", "x"]);
        assert_eq!(tokens[1].column(), 8);
    }

    #[test]
    fn test_letters_are_classified_by_general_category() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: true,
            ..LexicalPreferences::default()
        };

        // U+216B is a number letter: discarded when no word is pending
        let mut scanner = Scanner::with_preferences(preferences.clone());
        assert!(scanner.scan_str("\u{216B}").unwrap().is_empty());
        assert_eq!(scanner.metrics().discarded_digits, 1);

        // U+0345 is a combining mark: skipped, the pending word is kept
        let mut scanner = Scanner::with_preferences(preferences);
        assert!(scanner.scan_str("\u{345}").unwrap().is_empty());
        assert_eq!(scanner.metrics().skipped_runes, 1);
        assert_eq!(
            summary(&scan("a\u{345}b")),
            vec![(TokenKind::Identifier, "ab", 1, 1, 0)]
        );

        assert_eq!(
            summary(&scan("\u{e9}t\u{e9} \u{3bb}")),
            vec![
                (TokenKind::Identifier, "\u{e9}t\u{e9}", 1, 1, 0),
                (TokenKind::Identifier, "\u{3bb}", 1, 5, 4),
            ]
        );
    }

    #[test]
    fn test_non_decimal_numbers_follow_letters() {
        assert_eq!(
            summary(&scan("x\u{b2} \u{bd}")),
            vec![(TokenKind::Identifier, "x\u{b2}", 1, 1, 0)]
        );
    }

    #[test]
    fn test_trailing_word_is_flushed_at_end() {
        let tokens = scan("  last");
        assert_eq!(summary(&tokens), vec![(TokenKind::Identifier, "last", 1, 3, 2)]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(scan("").is_empty());
        assert!(scan(" \n\t\r\n").is_empty());
    }

    #[test]
    fn test_metrics() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: true,
            ..LexicalPreferences::default()
        };
        let mut scanner = Scanner::with_preferences(preferences);
        scanner.scan_str("package a1 b;\n7 ?").unwrap();

        let metrics = scanner.metrics();
        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.separator_tokens, 1);
        assert_eq!(metrics.discarded_digits, 1);
        assert_eq!(metrics.skipped_runes, 1);
        assert_eq!(metrics.longest_word, 7);
        assert_eq!(metrics.lines, 2);
    }

    #[test]
    fn test_word_too_long() {
        let source = "a".repeat(MAX_WORD_LENGTH + 1);
        assert_matches!(
            Scanner::new().scan_str(&source),
            Err(LexerError::WordTooLong { position }) if position.column == 1
        );

        let exact = "b".repeat(MAX_WORD_LENGTH);
        assert_eq!(scan(&exact).len(), 1);
    }

    #[test]
    fn test_scan_reader_matches_scan_str() {
        let source = "package demo app\nclass Widget { }";
        let mut reader = RuneReader::new(source.as_bytes());
        let mut streamed = Vec::new();
        let mut sink = |token: Token| -> Result<(), LexerError> {
            streamed.push(token);
            Ok(())
        };

        let metrics = Scanner::new().scan_reader(&mut reader, &mut sink).unwrap();
        assert_eq!(metrics.total_tokens, 7);
        assert_eq!(streamed, scan(source));
    }

    #[test]
    fn test_sink_errors_stop_scanning() {
        #[derive(Debug)]
        enum Stop {
            Lexer,
            Sink,
        }
        impl From<LexerError> for Stop {
            fn from(_: LexerError) -> Self {
                Stop::Lexer
            }
        }

        let mut seen = 0;
        let mut sink = |_token: Token| -> Result<(), Stop> {
            seen += 1;
            if seen == 2 {
                Err(Stop::Sink)
            } else {
                Ok(())
            }
        };

        let mut scanner = Scanner::new();
        let mut result = Ok(());
        for rune in "a b c".chars() {
            result = scanner.push(rune, &mut sink);
            if result.is_err() {
                break;
            }
        }
        assert_matches!(result, Err(Stop::Sink));
        assert_eq!(scanner.position().index, 3);
    }
}
