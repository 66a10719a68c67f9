//! Persisted token dump (`.bo` files)
//!
//! One record per line: `<tag> <index> <payload>`. The tag is the token kind
//! (0 keyword, 1 identifier, 2 operator, 3 separator), the index is the
//! 0-based character index of the token start, and the payload is the keyword
//! id, the identifier text or the operator/separator character.

use super::token::{Token, TokenKind};
use crate::grammar::keywords::{Keyword, Operator, Separator};
use crate::logging::{codes, Code};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Extension of token dump files
pub const DUMP_EXTENSION: &str = "bo";

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("Failed to write token dump: {0}")]
    Write(#[source] io::Error),

    #[error("Failed to read token dump: {0}")]
    Read(#[source] io::Error),

    #[error("Malformed dump record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl DumpError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Write(_) => codes::dump::DUMP_WRITE_FAILURE,
            Self::Read(_) => codes::file_processing::IO_ERROR,
            Self::Malformed { .. } => codes::dump::MALFORMED_DUMP_RECORD,
        }
    }
}

/// One decoded dump line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRecord {
    pub kind: TokenKind,
    pub index: usize,
    /// Token text; keyword ids are decoded back to the keyword word
    pub value: String,
}

impl DumpRecord {
    pub fn from_token(token: &Token) -> Self {
        Self {
            kind: token.kind(),
            index: token.index(),
            value: token.value().to_string(),
        }
    }

    fn parse(line: &str, line_number: usize) -> Result<Self, DumpError> {
        let mut fields = line.splitn(3, ' ');
        let (tag, index, payload) = match (fields.next(), fields.next(), fields.next()) {
            (Some(tag), Some(index), Some(payload)) => (tag, index, payload),
            _ => return Err(DumpError::malformed(line_number, "expected three fields")),
        };

        let kind = tag
            .parse::<u8>()
            .ok()
            .and_then(TokenKind::from_dump_tag)
            .ok_or_else(|| DumpError::malformed(line_number, format!("unknown tag '{}'", tag)))?;

        let index = index.parse::<usize>().map_err(|_| {
            DumpError::malformed(line_number, format!("invalid index '{}'", index))
        })?;

        let value = match kind {
            TokenKind::Keyword => payload
                .parse::<u8>()
                .ok()
                .and_then(Keyword::from_id)
                .map(|keyword| keyword.as_str().to_string())
                .ok_or_else(|| {
                    DumpError::malformed(line_number, format!("unknown keyword id '{}'", payload))
                })?,
            TokenKind::Identifier => {
                if payload.is_empty() || payload.contains(char::is_whitespace) {
                    return Err(DumpError::malformed(line_number, "invalid identifier"));
                }
                payload.to_string()
            }
            TokenKind::Operator => single_char(payload)
                .and_then(Operator::from_char)
                .map(|op| op.as_char().to_string())
                .ok_or_else(|| {
                    DumpError::malformed(line_number, format!("unknown operator '{}'", payload))
                })?,
            TokenKind::Separator => single_char(payload)
                .and_then(Separator::from_char)
                .map(|sep| sep.as_char().to_string())
                .ok_or_else(|| {
                    DumpError::malformed(line_number, format!("unknown separator '{}'", payload))
                })?,
        };

        Ok(Self { kind, index, value })
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// ============================================================================
// WRITER
// ============================================================================

/// Encodes tokens as dump records. Call [`DumpWriter::finish`] to flush.
pub struct DumpWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> DumpWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    pub fn write_token(&mut self, token: &Token) -> Result<(), DumpError> {
        writeln!(
            self.inner,
            "{} {} {}",
            token.kind().dump_tag(),
            token.index(),
            token.dump_payload()
        )
        .map_err(DumpError::Write)?;
        self.records += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Flush buffered records and hand back the sink
    pub fn finish(mut self) -> Result<W, DumpError> {
        self.inner.flush().map_err(DumpError::Write)?;
        Ok(self.inner)
    }
}

// ============================================================================
// READER
// ============================================================================

/// Iterator over dump records of a buffered source
pub struct DumpReader<R: BufRead> {
    lines: io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> DumpReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = Result<DumpRecord, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(
            line.map_err(DumpError::Read)
                .and_then(|line| DumpRecord::parse(&line, self.line_number)),
        )
    }
}

/// Decode a whole dump held in memory
pub fn decode_dump(content: &str) -> Result<Vec<DumpRecord>, DumpError> {
    DumpReader::new(content.as_bytes()).collect()
}

/// `<dir>/<file name up to the first '.'>.bo`
pub fn dump_path_for(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    let dump_name = format!("{}.{}", stem, DUMP_EXTENSION);

    match input.parent() {
        Some(dir) => dir.join(dump_name),
        None => PathBuf::from(dump_name),
    }
}
