//! Diagnostic events raised while checking box sources

use super::codes::{self, Code, ErrorMetadata};
use crate::utils::Span;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Event levels, most severe first so `<=` means "at least as severe"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Lowercase form used as the prefix of report entries
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

// Placeholders for events raised without a registered code
const UNCODED_WARNING: Code = Code::new("W000");
const UNCODED_INFO: Code = Code::new("I000");
const UNCODED_DEBUG: Code = Code::new("D000");

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Source range of the offending word, when the event is about one
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, code: Code, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.into(),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, UNCODED_WARNING, message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, UNCODED_INFO, message)
    }

    /// Info-level event for a completed stage, tagged with its success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, UNCODED_DEBUG, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn metadata(&self) -> Option<&'static ErrorMetadata> {
        codes::get_error_metadata(self.code.as_str())
    }

    pub fn category(&self) -> &'static str {
        self.metadata().map_or("Unknown", |m| m.category)
    }

    pub fn requires_halt(&self) -> bool {
        self.metadata().is_some_and(|m| m.requires_halt)
    }

    /// Remediation hint for error codes that carry one
    pub fn help(&self) -> Option<&'static str> {
        self.metadata()
            .filter(|_| self.is_error())
            .map(|m| m.recommended_action)
    }

    /// Line and column where the offending word starts
    pub fn location(&self) -> Option<(u32, u32)> {
        self.span.as_ref().map(|s| (s.start().line, s.start().column))
    }

    /// One JSON object per event for the structured output mode
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "category": self.category(),
            "message": self.message,
        });

        if let Some((line, column)) = self.location() {
            json["line"] = line.into();
            json["column"] = column.into();
        }

        if self.is_error() {
            json["halts"] = self.requires_halt().into();
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}

/// Console form: `LEVEL CODE message (line:column)`
impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {} {}", self.level.as_str(), self.code, self.message)?;
        if let Some((line, column)) = self.location() {
            write!(f, " ({}:{})", line, column)?;
        }
        Ok(())
    }
}
