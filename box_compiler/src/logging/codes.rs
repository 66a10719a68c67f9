//! Consolidated error codes and classification system
//!
//! Single source of truth for every code the compiler emits together with its
//! behavioral metadata (category, severity, recoverability, halt behavior).

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const READ_FAILURE: Code = Code::new("E020");
    pub const WORD_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Token dump error codes
pub mod dump {
    use super::Code;

    pub const DUMP_WRITE_FAILURE: Code = Code::new("E030");
    pub const MALFORMED_DUMP_RECORD: Code = Code::new("E031");
}

/// Rule chain validation error codes
pub mod syntax {
    use super::Code;

    pub const INCOMPLETE_DECLARATION: Code = Code::new("E040");
    pub const EMPTY_TOKEN_STREAM: Code = Code::new("E041");
    pub const KIND_MISMATCH: Code = Code::new("E043");
    pub const VALUE_MISMATCH: Code = Code::new("E044");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E060");
    pub const NO_FILES_FOUND: Code = Code::new("E061");
    pub const DISCOVERY_FAILURE: Code = Code::new("E062");
    pub const WORKER_FAILURE: Code = Code::new("E063");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I007");

    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TOKEN_DUMP_WRITTEN: Code = Code::new("I021");

    pub const TOKEN_ACCEPTED: Code = Code::new("I040");
    pub const DECLARATION_ACCEPTED: Code = Code::new("I041");
    pub const SYNTAX_VALIDATION_PASSED: Code = Code::new("I042");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const METADATA: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal system error",
        "File a bug report with the input that triggered it",
    ),
    // File processing
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File not found at specified path",
        "Check file path and ensure file exists",
    ),
    ErrorMetadata::new(
        "E006",
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "File does not have .box extension",
        "Rename file with .box extension or disable the extension requirement",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File exceeds maximum size limit",
        "Reduce file size or rebuild with a larger max_file_size",
    ),
    ErrorMetadata::new(
        "E008",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File is empty when content expected",
        "Provide a file that starts with a package declaration",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Permission denied accessing file",
        "Check file permissions and user access rights",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "I/O error during file operation",
        "Check disk space, permissions, and file system integrity",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Invalid file path provided",
        "Provide a path to a regular file",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::High,
        false,
        true,
        "Source stream could not be read",
        "Check that the file is readable and not truncated",
    ),
    ErrorMetadata::new(
        "E023",
        "Lexical",
        Severity::Medium,
        false,
        true,
        "Word exceeds maximum allowed length",
        "Shorten the identifier or rebuild with a larger max_word_length",
    ),
    ErrorMetadata::new(
        "E027",
        "Lexical",
        Severity::Medium,
        false,
        true,
        "File produces more tokens than allowed",
        "Split the file or rebuild with a larger max_token_count",
    ),
    // Token dump
    ErrorMetadata::new(
        "E030",
        "TokenDump",
        Severity::Medium,
        false,
        true,
        "Token dump could not be written",
        "Check write permissions on the source directory",
    ),
    ErrorMetadata::new(
        "E031",
        "TokenDump",
        Severity::Medium,
        false,
        true,
        "Token dump record is malformed",
        "Regenerate the dump from the source file",
    ),
    // Syntax
    ErrorMetadata::new(
        "E040",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Input ended before the package declaration was complete",
        "Complete the declaration: package <name> <name>",
    ),
    ErrorMetadata::new(
        "E041",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "No tokens were produced from the input",
        "Start the file with a package declaration",
    ),
    ErrorMetadata::new(
        "E043",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Token kind does not match the expected rule",
        "Check the token order of the declaration",
    ),
    ErrorMetadata::new(
        "E044",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Token value does not match the expected keyword",
        "Use the keyword named in the error message",
    ),
    // Batch
    ErrorMetadata::new(
        "E060",
        "Batch",
        Severity::Medium,
        false,
        true,
        "Input directory not found",
        "Check the directory path",
    ),
    ErrorMetadata::new(
        "E061",
        "Batch",
        Severity::Low,
        true,
        false,
        "No .box files found in directory",
        "Check the directory contents or enable recursive discovery",
    ),
    ErrorMetadata::new(
        "E062",
        "Batch",
        Severity::Medium,
        false,
        true,
        "Directory traversal failed",
        "Check directory permissions",
    ),
    ErrorMetadata::new(
        "E063",
        "Batch",
        Severity::High,
        false,
        true,
        "Worker thread failed during batch processing",
        "Re-run with --sequential to isolate the failing file",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "Success",
        Severity::Low,
        true,
        false,
        "Operation completed successfully",
        "None",
    ),
    ErrorMetadata::new(
        "I004",
        "Success",
        Severity::Low,
        true,
        false,
        "System initialization completed",
        "None",
    ),
    ErrorMetadata::new(
        "I006",
        "Success",
        Severity::Low,
        true,
        false,
        "File processed successfully",
        "None",
    ),
    ErrorMetadata::new(
        "I007",
        "Success",
        Severity::Low,
        true,
        false,
        "File discovery completed",
        "None",
    ),
    ErrorMetadata::new(
        "I020",
        "Success",
        Severity::Low,
        true,
        false,
        "Tokenization completed",
        "None",
    ),
    ErrorMetadata::new(
        "I021",
        "Success",
        Severity::Low,
        true,
        false,
        "Token dump written",
        "None",
    ),
    ErrorMetadata::new(
        "I040",
        "Success",
        Severity::Low,
        true,
        false,
        "Token accepted by the rule chain",
        "None",
    ),
    ErrorMetadata::new(
        "I041",
        "Success",
        Severity::Low,
        true,
        false,
        "Package declaration accepted",
        "None",
    ),
    ErrorMetadata::new(
        "I042",
        "Success",
        Severity::Low,
        true,
        false,
        "Rule chain validation passed",
        "None",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        METADATA
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Verify that every code in `codes` has registered metadata
pub fn ensure_registered(codes: &[Code]) -> Result<(), String> {
    for code in codes {
        if get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_no_duplicate_codes() {
        let unique: HashSet<_> = METADATA.iter().map(|m| m.code).collect();
        assert_eq!(unique.len(), METADATA.len());
    }

    #[test]
    fn test_classification_lookup() {
        assert_eq!(get_category(syntax::KIND_MISMATCH.as_str()), "Syntax");
        assert!(requires_halt(lexical::READ_FAILURE.as_str()));
        assert_eq!(get_severity(system::INTERNAL_ERROR.as_str()), Severity::Critical);
        assert!(is_recoverable(batch::NO_FILES_FOUND.as_str()));
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(!requires_halt("E999"));
    }

    #[test]
    fn test_ensure_registered() {
        assert!(ensure_registered(&[
            success::TOKEN_ACCEPTED,
            dump::MALFORMED_DUMP_RECORD
        ])
        .is_ok());
        assert!(ensure_registered(&[Code::new("X123")]).is_err());
    }
}
