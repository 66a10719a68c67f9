//! Batch processing module for box file validation
//!
//! Provides directory-based batch processing with sequential and parallel execution modes.
//! Every file gets its own scanner and rule walker; only the global logging
//! collector is shared between workers.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::RuntimeConfig;
use crate::file_processor::BOX_EXTENSION;
use crate::logging::codes;
use crate::pipeline::{self, PipelineError, PipelineResult};
use crate::tokens::{dump_path_for, Token};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
    /// Preferences handed to every per-file session
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(MAX_WORKER_THREADS),
            recursive: true,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Thread count clamped to `1..=MAX_WORKER_THREADS`
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS.max(1))
    }

    fn file_limit(&self) -> usize {
        self.max_files
            .map(|limit| limit.min(MAX_FILES_PER_BATCH))
            .unwrap_or(MAX_FILES_PER_BATCH)
    }
}

/// Batch processing results
#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn total_declarations(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.declarations)
            .sum()
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    /// Restore discovery order after parallel workers finished out of order
    fn sort_by_path(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {} declarations, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.total_declarations(),
            self.processing_duration.as_secs_f64()
        )
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No box files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Thread pool error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> codes::Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            BatchError::IoError { .. } => codes::batch::DISCOVERY_FAILURE,
            BatchError::ThreadError { .. } => codes::batch::WORKER_FAILURE,
        }
    }

    fn logged(self) -> Self {
        crate::log_error!(self.error_code(), &self.to_string());
        self
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Discover box files in a directory, sorted by path
pub fn discover_box_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        }
        .logged());
    }

    let limit = config.file_limit();
    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive, limit).map_err(BatchError::logged)?;

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        }
        .logged());
    }

    files.sort();

    if config.runtime.lexical.write_token_dump {
        for (dump_path, sources) in find_dump_collisions(&files) {
            let sources: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
            crate::log_warning!(
                "Several sources share one token dump; the last writer wins",
                "dump" => dump_path.display(),
                "sources" => sources.join(", ")
            );
        }
    }

    crate::log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

/// Dump paths claimed by more than one source, e.g. `a.v1.box` and `a.v2.box`
pub fn find_dump_collisions(files: &[PathBuf]) -> Vec<(PathBuf, Vec<PathBuf>)> {
    let mut by_dump: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        by_dump.entry(dump_path_for(file)).or_default().push(file.clone());
    }

    by_dump
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .collect()
}

/// Collect box files; stops once `limit` files have been found
fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    recursive: bool,
    limit: usize,
) -> Result<(), BatchError> {
    let mut entries = fs::read_dir(dir_path)
        .map_err(|e| BatchError::IoError {
            error: format!("{}: {}", dir_path.display(), e),
        })?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BatchError::IoError {
            error: e.to_string(),
        })?;

    // Deterministic truncation when the limit is hit
    entries.sort();

    for path in entries {
        if files.len() >= limit {
            crate::log_warning!(
                "Reached maximum file limit",
                "files_found" => files.len(),
                "limit" => limit
            );
            return Ok(());
        }

        if path.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive, limit)?;
            }
        } else if is_box_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a path represents a box file
fn is_box_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(BOX_EXTENSION))
            .unwrap_or(false)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn process_one(file_path: &Path, file_id: usize, config: &BatchConfig) -> Result<PipelineResult, PipelineError> {
    let mut ignore = |_: &Token| {};
    pipeline::process_file_in_context(file_path, file_id, &config.runtime, &mut ignore)
}

/// Process a directory of box files one after another
pub fn process_directory_sequential(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();

    crate::log_info!("Starting sequential batch processing",
        "directory" => dir_path.display()
    );

    let files = discover_box_files(dir_path, config)?;
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            println!(
                "Processing file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }

        match process_one(file_path, file_id, config) {
            Ok(result) => results.add_success(file_path.clone(), result),
            Err(error) => {
                results.add_failure(file_path.clone(), error);
                if config.fail_fast {
                    crate::log_warning!("Fail-fast mode enabled, stopping batch processing",
                        "file" => file_path.display()
                    );
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
        "Sequential batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Process files on up to `max_threads` scoped worker threads
pub fn process_directory_parallel(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.effective_threads();

    crate::log_info!("Starting parallel batch processing",
        "directory" => dir_path.display(),
        "max_threads" => threads
    );

    let files = discover_box_files(dir_path, config)?;
    let chunk_size = calculate_chunk_size(files.len(), threads);

    crate::log_debug!("Parallel processing configuration",
        "total_files" => files.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    let shared = Mutex::new(BatchResults::new());
    let stop = AtomicBool::new(false);

    let worker_panicked = thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk_id, chunk)| {
                let shared = &shared;
                let stop = &stop;
                scope.spawn(move || {
                    for (offset, file_path) in chunk.iter().enumerate() {
                        if config.fail_fast && stop.load(Ordering::Relaxed) {
                            break;
                        }

                        let outcome = process_one(file_path, chunk_id * chunk_size + offset, config);
                        let mut guard = shared.lock().unwrap_or_else(|p| p.into_inner());
                        match outcome {
                            Ok(result) => guard.add_success(file_path.clone(), result),
                            Err(error) => {
                                guard.add_failure(file_path.clone(), error);
                                stop.store(true, Ordering::Relaxed);
                            }
                        }
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(Result::is_err)
            .count()
    });

    if worker_panicked > 0 {
        return Err(BatchError::ThreadError {
            message: format!("{} worker thread(s) panicked during processing", worker_panicked),
        }
        .logged());
    }

    let mut results = shared.into_inner().unwrap_or_else(|p| p.into_inner());
    results.files_discovered = files.len();
    results.sort_by_path();
    results.processing_duration = start_time.elapsed();

    if config.fail_fast && results.failure_count() > 0 {
        crate::log_warning!("Fail-fast mode enabled, batch processing stopped early",
            "files_processed" => results.files_processed,
            "files_discovered" => results.files_discovered
        );
    }

    crate::log_success!(
        codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
        "Parallel batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Files per worker so that at most `max_threads` chunks exist
fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    let threads = max_threads.max(1);
    file_count.div_ceil(threads).max(1)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Process a directory with custom configuration
pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.effective_threads() == 1 {
        process_directory_sequential(dir_path, config)
    } else {
        process_directory_parallel(dir_path, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn sequential() -> BatchConfig {
        BatchConfig {
            max_threads: 1,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_file_discovery() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        fs::write(temp_path.join("b.box"), "package b c").unwrap();
        fs::write(temp_path.join("a.box"), "package a b").unwrap();
        fs::write(temp_path.join("notes.txt"), "not box").unwrap();
        fs::create_dir(temp_path.join("nested")).unwrap();
        fs::write(temp_path.join("nested").join("c.box"), "package c d").unwrap();

        let files = discover_box_files(temp_path, &BatchConfig::default()).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));

        let flat = BatchConfig {
            recursive: false,
            ..BatchConfig::default()
        };
        assert_eq!(discover_box_files(temp_path, &flat).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_errors() {
        let temp_dir = tempdir().unwrap();
        assert_matches!(
            discover_box_files(&temp_dir.path().join("missing"), &BatchConfig::default()),
            Err(BatchError::DirectoryNotFound { .. })
        );
        assert_matches!(
            discover_box_files(temp_dir.path(), &BatchConfig::default()),
            Err(BatchError::NoFilesFound { .. })
        );
    }

    #[test]
    fn test_max_files_limit() {
        let temp_dir = tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(temp_dir.path().join(format!("{}.box", name)), "package x y").unwrap();
        }

        let config = BatchConfig {
            max_files: Some(2),
            ..BatchConfig::default()
        };
        let files = discover_box_files(temp_dir.path(), &config).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.box"));
    }

    #[test]
    fn test_dump_collisions() {
        let files: Vec<PathBuf> = ["src/a.v1.box", "src/a.v2.box", "src/b.box", "lib/a.box"]
            .into_iter()
            .map(PathBuf::from)
            .collect();

        assert_eq!(
            find_dump_collisions(&files),
            vec![(
                PathBuf::from("src/a.bo"),
                vec![PathBuf::from("src/a.v1.box"), PathBuf::from("src/a.v2.box")]
            )]
        );
        assert!(find_dump_collisions(&files[2..]).is_empty());
    }

    #[test]
    fn test_discovery_keeps_colliding_sources() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.v1.box"), "package a b").unwrap();
        fs::write(temp_dir.path().join("a.v2.box"), "package c d").unwrap();

        let mut config = BatchConfig::default();
        config.runtime.lexical.write_token_dump = true;

        let files = discover_box_files(temp_dir.path(), &config).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(find_dump_collisions(&files).len(), 1);
    }

    #[test]
    fn test_is_box_file() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        let box_file = temp_path.join("test.BOX");
        let txt_file = temp_path.join("test.txt");
        fs::write(&box_file, "content").unwrap();
        fs::write(&txt_file, "content").unwrap();

        assert!(is_box_file(&box_file));
        assert!(!is_box_file(&txt_file));
        assert!(!is_box_file(temp_path));
    }

    #[test]
    fn test_sequential_processing() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("good.box"), "package a b package c d").unwrap();
        fs::write(temp_dir.path().join("bad.box"), "import a b").unwrap();

        let results = process_directory_with_config(temp_dir.path(), &sequential()).unwrap();
        assert_eq!(results.files_discovered, 2);
        assert_eq!(results.success_count(), 1);
        assert_eq!(results.failure_count(), 1);
        assert_eq!(results.total_declarations(), 2);
        assert!((results.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sequential_fail_fast() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.box"), "import a b").unwrap();
        fs::write(temp_dir.path().join("b.box"), "package a b").unwrap();

        let config = BatchConfig {
            fail_fast: true,
            ..sequential()
        };
        let results = process_directory_with_config(temp_dir.path(), &config).unwrap();
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_parallel_processing() {
        let temp_dir = tempdir().unwrap();
        for i in 0..6 {
            fs::write(
                temp_dir.path().join(format!("file{}.box", i)),
                "package app core\n",
            )
            .unwrap();
        }

        let config = BatchConfig {
            max_threads: 3,
            ..BatchConfig::default()
        };
        let results = process_directory_parallel(temp_dir.path(), &config).unwrap();
        assert_eq!(results.files_processed, 6);
        assert_eq!(results.success_count(), 6);
        assert!(results
            .successful_files
            .windows(2)
            .all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(100, 4), 25);
        assert_eq!(calculate_chunk_size(10, 4), 3);
        assert_eq!(calculate_chunk_size(1, 4), 1);
        assert_eq!(calculate_chunk_size(0, 4), 1);
        assert_eq!(calculate_chunk_size(5, 0), 5);
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert!(config.effective_threads() >= 1);
        assert!(config.effective_threads() <= MAX_WORKER_THREADS.max(1));
        assert!(config.recursive);
        assert!(!config.fail_fast);
        assert!(config.max_files.is_none());
    }

    #[test]
    fn test_batch_error_codes() {
        let error = BatchError::NoFilesFound {
            path: "x".to_string(),
        };
        assert_eq!(error.error_code(), codes::batch::NO_FILES_FOUND);
    }
}
