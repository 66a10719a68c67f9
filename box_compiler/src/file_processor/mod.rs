//! File processor module with compile-time constants and global logging integration

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::logging::codes;
use std::path::Path;

pub use processor::{
    FileMetadata, FileProcessor, FileProcessorError, OpenedFile, BOX_EXTENSION,
};

/// Open a file with default settings
pub fn open_file(file_path: &Path) -> Result<OpenedFile, FileProcessorError> {
    FileProcessor::new().open_file(file_path)
}

/// Compile-time maximum file size; cannot be changed at runtime
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

pub fn get_large_file_threshold() -> u64 {
    LARGE_FILE_THRESHOLD
}

/// Initialize file processor logging validation (for system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    codes::ensure_registered(&[
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::EMPTY_FILE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
        codes::success::FILE_PROCESSING_SUCCESS,
    ])?;

    if LARGE_FILE_THRESHOLD > MAX_FILE_SIZE {
        return Err("Large file threshold exceeds maximum file size".to_string());
    }

    crate::log_debug!("File processor limits initialized",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert!(get_max_file_size() >= get_large_file_threshold());
        assert!(init_file_processor_logging().is_ok());
    }
}
