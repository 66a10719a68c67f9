//! One scan-and-validate session
//!
//! Runes are pulled from the reader one at a time. Every token the scanner
//! emits goes to the dump writer (when present), then to the rule walker,
//! then to the observer, before the next rune is read. The first failure
//! from any stage ends the session.

use super::error::PipelineError;
use super::result::SessionOutcome;
use crate::config::runtime::RuntimeConfig;
use crate::lexical::{RuneReader, Scanner};
use crate::syntax::RuleWalker;
use crate::tokens::{DumpWriter, Token};
use crate::{log_debug, log_error, log_warning};
use std::io::{self, BufRead, Write};

pub fn run_session<R, W>(
    reader: R,
    mut dump: Option<&mut DumpWriter<W>>,
    config: &RuntimeConfig,
    observer: &mut dyn FnMut(&Token),
) -> Result<SessionOutcome, PipelineError>
where
    R: BufRead,
    W: Write,
{
    let mut runes = RuneReader::new(reader);
    let mut scanner = Scanner::with_preferences(config.lexical.clone());
    let mut walker = RuleWalker::with_preferences(config.syntax.clone());
    let mut accepted_tokens = 0usize;

    let mut sink = |token: Token| -> Result<(), PipelineError> {
        if let Some(writer) = dump.as_deref_mut() {
            writer.write_token(&token).map_err(|error| {
                log_error!(error.error_code(), &error.to_string(),
                    "index" => token.index()
                );
                error
            })?;
        }

        walker.validate(&token)?;
        accepted_tokens += 1;
        observer(&token);
        Ok(())
    };

    let metrics = scanner.scan_reader(&mut runes, &mut sink)?;
    let declarations = walker.finish()?;

    if runes.invalid_sequences() > 0 {
        log_warning!("Input contained invalid UTF-8 sequences",
            "sequences" => runes.invalid_sequences(),
            "bytes" => runes.bytes_consumed()
        );
    }

    let dump_records = dump.map(|writer| writer.records_written()).unwrap_or(0);
    log_debug!("Session finished",
        "declarations" => declarations,
        "accepted_tokens" => accepted_tokens,
        "dump_records" => dump_records
    );

    Ok(SessionOutcome {
        metrics,
        declarations,
        accepted_tokens,
        dump_records,
    })
}

/// Scan and validate in-memory source without touching the file system
pub fn process_source(
    source: &str,
    config: &RuntimeConfig,
) -> Result<SessionOutcome, PipelineError> {
    run_session(
        source.as_bytes(),
        None::<&mut DumpWriter<io::Sink>>,
        config,
        &mut |_| {},
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxError;
    use crate::tokens::{decode_dump, TokenKind};
    use assert_matches::assert_matches;

    #[test]
    fn test_tokens_reach_every_sink_in_order() {
        let config = RuntimeConfig::default();
        let mut writer = DumpWriter::new(Vec::new());
        let mut seen = Vec::new();

        let outcome = run_session(
            "package foo bar".as_bytes(),
            Some(&mut writer),
            &config,
            &mut |token| seen.push(token.classification_line()),
        )
        .unwrap();

        assert_eq!(outcome.declarations, 1);
        assert_eq!(outcome.accepted_tokens, 3);
        assert_eq!(outcome.dump_records, 3);
        assert_eq!(
            seen,
            vec![
                "Line: 1, Offset: 1, Type: Keyword, Value: package",
                "Line: 1, Offset: 9, Type: Identifier, Value: foo",
                "Line: 1, Offset: 13, Type: Identifier, Value: bar",
            ]
        );

        let bytes = writer.finish().unwrap();
        let records = decode_dump(&String::from_utf8(bytes).unwrap()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind, TokenKind::Keyword);
        assert_eq!(records[2].index, 12);
    }

    #[test]
    fn test_failing_token_is_dumped_but_not_observed() {
        let config = RuntimeConfig::default();
        let mut writer = DumpWriter::new(Vec::new());
        let mut observed = 0;

        let result = run_session(
            "package ; foo".as_bytes(),
            Some(&mut writer),
            &config,
            &mut |_| observed += 1,
        );

        assert_matches!(
            result,
            Err(PipelineError::SyntaxValidation(SyntaxError::KindMismatch { .. }))
        );
        assert_eq!(observed, 1);
        assert_eq!(writer.records_written(), 2);
    }

    #[test]
    fn test_process_source() {
        let config = RuntimeConfig::default();
        let outcome = process_source("package a b\npackage c d\n", &config).unwrap();
        assert_eq!(outcome.declarations, 2);
        assert_eq!(outcome.metrics.total_tokens, 6);
        assert_eq!(outcome.dump_records, 0);
    }

    #[test]
    fn test_whitespace_only_source_is_empty_stream() {
        let config = RuntimeConfig::default();
        assert_matches!(
            process_source(" \n\t\n", &config),
            Err(PipelineError::SyntaxValidation(SyntaxError::EmptyTokenStream))
        );
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let config = RuntimeConfig::default();
        let source: &[u8] = b"package \xff foo bar";
        let outcome = run_session(source, None::<&mut DumpWriter<io::Sink>>, &config, &mut |_| {})
            .unwrap();
        assert_eq!(outcome.declarations, 1);
    }
}
