// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Read a boolean preference from the environment, falling back to `default`.
fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Reject inputs that do not carry the .box extension
    pub require_box_extension: bool,

    /// Attach timing and size metrics to the file-processing success event
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_box_extension: env_flag(env_vars::REQUIRE_BOX_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Persist every token to a `.bo` dump next to the source file
    pub write_token_dump: bool,

    /// Emit a debug event for every token the scanner classifies
    pub log_token_classification: bool,

    /// Count skipped characters and dropped digits in the lexical metrics
    pub collect_detailed_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            write_token_dump: env_flag(env_vars::LEXICAL_WRITE_TOKEN_DUMP, false),
            log_token_classification: env_flag(env_vars::LEXICAL_LOG_CLASSIFICATION, false),
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Report every accepted token to the classification sink
    pub report_accepted_tokens: bool,

    /// Treat a file that ends mid-declaration as a failure
    pub require_complete_declaration: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            report_accepted_tokens: env_flag(env_vars::SYNTAX_REPORT_ACCEPTED, true),
            require_complete_declaration: env_flag(env_vars::SYNTAX_REQUIRE_COMPLETE, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of human readable text
    pub use_structured_logging: bool,

    /// Print log events to the console
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Print the cargo-style per-file summary
    pub enable_cargo_style_output: bool,

    /// Include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a preferences file
#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read preferences file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid preferences file {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text. Missing tables and keys keep their
    /// environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load preferences from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self, RuntimeConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| RuntimeConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| RuntimeConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Render the effective preferences as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_BOX_EXTENSION: &str = "BOX_REQUIRE_BOX_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "BOX_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_WRITE_TOKEN_DUMP: &str = "BOX_LEXICAL_WRITE_TOKEN_DUMP";
    pub const LEXICAL_LOG_CLASSIFICATION: &str = "BOX_LEXICAL_LOG_CLASSIFICATION";
    pub const LEXICAL_DETAILED_METRICS: &str = "BOX_LEXICAL_DETAILED_METRICS";

    // Syntax
    pub const SYNTAX_REPORT_ACCEPTED: &str = "BOX_SYNTAX_REPORT_ACCEPTED";
    pub const SYNTAX_REQUIRE_COMPLETE: &str = "BOX_SYNTAX_REQUIRE_COMPLETE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "BOX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "BOX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "BOX_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "BOX_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "BOX_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [lexical]
            write_token_dump = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.lexical.write_token_dump);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(config.syntax, SyntaxPreferences::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "[syntax]\nrequire_complete_declaration = false\n").unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert!(!config.syntax.require_complete_declaration);
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[lexical\nwrite_token_dump = yes").unwrap();

        let error = RuntimeConfig::load(&path).unwrap_err();
        assert!(matches!(error, RuntimeConfigError::Parse { .. }));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = RuntimeConfig::default();
        let rendered = config.to_toml_string().unwrap();
        let parsed = RuntimeConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
