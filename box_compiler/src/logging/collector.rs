//! Per-file diagnostics gathered across a batch
//!
//! Workers record errors and warnings against the box file they are checking.
//! Once the batch is done the collector renders one report block per file in
//! path order, independent of the order workers finished in.

use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// The file the current thread is checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

impl FileContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self { file_path, file_id }
    }
}

/// Diagnostics kept for one file
#[derive(Debug, Clone, Default)]
pub struct FileDiagnostics {
    pub events: Vec<LogEvent>,
    /// Events past the per-file cap, counted but not kept
    pub suppressed: usize,
}

impl FileDiagnostics {
    pub fn error_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_warning()).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticTotals {
    pub files: usize,
    pub files_with_errors: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Default)]
pub struct ErrorCollector {
    files: Mutex<BTreeMap<PathBuf, FileDiagnostics>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, FileDiagnostics>> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut files = self.lock();
        let diagnostics = files.entry(file_path.to_path_buf()).or_default();

        if diagnostics.events.len() < MAX_LOG_EVENTS_PER_FILE {
            diagnostics.events.push(event);
        } else {
            diagnostics.suppressed += 1;
        }
    }

    pub fn diagnostics(&self, file_path: &Path) -> Option<FileDiagnostics> {
        self.lock().get(file_path).cloned()
    }

    pub fn totals(&self) -> DiagnosticTotals {
        let files = self.lock();
        let mut totals = DiagnosticTotals {
            files: files.len(),
            ..DiagnosticTotals::default()
        };

        for diagnostics in files.values() {
            let errors = diagnostics.error_count();
            if errors > 0 {
                totals.files_with_errors += 1;
            }
            totals.errors += errors;
            totals.warnings += diagnostics.warning_count();
        }

        totals
    }

    /// Cargo-style report of every recorded diagnostic, grouped by file
    pub fn render_report(&self) -> String {
        let mut output = String::new();
        let files = self.lock();

        for (file_path, diagnostics) in files.iter() {
            for event in &diagnostics.events {
                render_event(&mut output, file_path, event);
            }
            if diagnostics.suppressed > 0 {
                let _ = writeln!(
                    output,
                    "note: {} more diagnostic(s) for {} were suppressed\n",
                    diagnostics.suppressed,
                    file_path.display()
                );
            }
        }
        drop(files);

        let totals = self.totals();
        if totals.errors > 0 || totals.warnings > 0 {
            let _ = writeln!(
                output,
                "box_compiler: {} error(s), {} warning(s) in {} file(s)",
                totals.errors, totals.warnings, totals.files
            );
        }

        output
    }
}

fn render_event(output: &mut String, file_path: &Path, event: &LogEvent) {
    let _ = writeln!(output, "{}[{}]: {}", event.level.label(), event.code, event.message);

    match event.location() {
        Some((line, column)) => {
            let _ = writeln!(output, "  --> {}:{}:{}", file_path.display(), line, column);
        }
        None => {
            let _ = writeln!(output, "  --> {}", file_path.display());
        }
    }

    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            let _ = writeln!(output, "   = {}: {}", key, value);
        }
    }

    if let Some(help) = event.help() {
        let _ = writeln!(output, "   = help: {}", help);
    }
    output.push('\n');
}
