//! File processor implementation with compile-time constants and global logging integration
//!
//! Files are validated and opened here but never read into memory: the
//! pipeline pulls runes from the returned buffered reader.

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Extension of box source files
pub const BOX_EXTENSION: &str = "box";

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .box, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
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

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(error: &io::Error, path: &Path, action: &str) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {} '{}': {}", action, path.display(), error),
            },
        }
    }
}

/// File metadata collected before scanning
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub is_box_file: bool,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    /// Uses the compile-time threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// A validated file ready for scanning
#[derive(Debug)]
pub struct OpenedFile {
    pub reader: BufReader<File>,
    pub metadata: FileMetadata,
    /// Time spent validating and opening
    pub open_duration: Duration,
}

/// File processor with compile-time security constants and runtime preferences
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_box_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_box_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_box_extension: prefs.require_box_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_box_extension_required(mut self, required: bool) -> Self {
        self.require_box_extension = required;
        self
    }

    /// Validate a path and open it for buffered reading
    pub fn open_file(&self, file_path: &Path) -> Result<OpenedFile, FileProcessorError> {
        let start_time = Instant::now();
        let display_path = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display_path.as_str());

        let path = self.validate_path(file_path)?;
        let metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata)?;

        let file = File::open(&path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, &path, "open");
            log_error!(error.error_code(), "Failed to open file",
                "file" => display_path.as_str(),
                "io_error" => e
            );
            error
        })?;

        let opened = OpenedFile {
            reader: BufReader::new(file),
            metadata,
            open_duration: start_time.elapsed(),
        };

        self.log_open_success(&opened);
        Ok(opened)
    }

    fn log_open_success(&self, opened: &OpenedFile) {
        let file = opened.metadata.path.display().to_string();

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File opened with performance metrics",
                "file" => file,
                "size_bytes" => opened.metadata.size,
                "size_human" => opened.metadata.human_readable_size(),
                "duration_ms" => format!("{:.2}", opened.open_duration.as_secs_f64() * 1000.0),
                "is_large_file" => opened.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File opened",
                "file" => file,
                "size_bytes" => opened.metadata.size
            );
        }
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        let path_str = file_path.display().to_string();

        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath { path: path_str };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: path_str.clone(),
            };
            log_error!(error.error_code(), "File not found", "path" => path_str);
            return Err(error);
        }

        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: path_str.clone(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => path_str);
            return Err(error);
        }

        file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(&e, file_path, "resolve path");
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => path_str.as_str(),
                "io_error" => e
            );
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read metadata for");
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_box_file = extension.as_deref() == Some(BOX_EXTENSION);

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            is_box_file,
            modified: metadata.modified().ok(),
        };

        log_debug!("File metadata collected",
            "size_bytes" => file_metadata.size,
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "is_box" => file_metadata.is_box_file,
            "max_size_bytes" => MAX_FILE_SIZE
        );

        Ok(file_metadata)
    }

    /// Size limit, emptiness and the optional extension requirement
    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        let file = metadata.path.display().to_string();

        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => file,
                "size_human" => metadata.human_readable_size(),
                "limit_human" => human_readable(MAX_FILE_SIZE)
            );
            return Err(error);
        }

        if metadata.size == 0 {
            let error = FileProcessorError::EmptyFile;
            log_error!(error.error_code(), "File is empty", "file" => file);
            return Err(error);
        }

        if self.require_box_extension && !metadata.is_box_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .box extension",
                "file" => file,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }

        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_open_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("demo.box");
        fs::write(&file_path, "package demo app\n").unwrap();

        let mut opened = FileProcessor::new().open_file(&file_path).unwrap();
        assert!(opened.metadata.is_box_file);
        assert_eq!(opened.metadata.size, 17);
        assert!(!opened.metadata.is_large_file());

        let mut content = String::new();
        opened.reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "package demo app\n");
    }

    #[test]
    fn test_file_not_found() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().open_file(&dir.path().join("missing.box"));
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().open_file(dir.path());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_empty_path() {
        let result = FileProcessor::new().open_file(Path::new(""));
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_compile_time_file_size_limit() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("large.box");
        let file = File::create(&file_path).unwrap();
        file.set_len(MAX_FILE_SIZE + 1).unwrap();

        let result = FileProcessor::new().open_file(&file_path);
        assert_matches!(
            result,
            Err(FileProcessorError::FileTooLarge { size, max_size })
                if size == MAX_FILE_SIZE + 1 && max_size == MAX_FILE_SIZE
        );
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        fs::write(&file_path, "package a b").unwrap();

        let strict = FileProcessor::new().with_box_extension_required(true);
        assert_matches!(
            strict.open_file(&file_path),
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "txt"
        );

        assert!(FileProcessor::new().open_file(&file_path).is_ok());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.box");
        fs::write(&file_path, "").unwrap();

        let result = FileProcessor::new().open_file(&file_path);
        assert_matches!(result, Err(FileProcessorError::EmptyFile));
    }

    #[test]
    fn test_error_metadata() {
        let error = FileProcessorError::FileNotFound {
            path: "x.box".to_string(),
        };
        assert_eq!(error.error_code(), codes::file_processing::FILE_NOT_FOUND);
        assert_eq!(error.category(), "FileProcessing");
        assert!(error.requires_halt());

        let error = FileProcessorError::InvalidExtension { extension: None };
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable(512), "512 B");
        assert_eq!(human_readable(2048), "2.00 KB");
    }

    #[test]
    fn test_from_preferences() {
        let prefs = FileProcessorPreferences {
            require_box_extension: true,
            enable_performance_logging: false,
        };
        let processor = FileProcessor::from_preferences(&prefs);
        assert!(processor.require_box_extension);
        assert!(!processor.enable_performance_logging);
    }
}
