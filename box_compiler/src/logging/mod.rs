//! Process-wide logging for the box compiler
//!
//! One [`LoggingService`] and one [`ErrorCollector`] are installed at startup.
//! Each worker thread tags its events with the box file it is checking, so
//! errors and warnings can be reported per file after a batch finishes.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::OnceLock;

pub use codes::Code;
pub use collector::{DiagnosticTotals, ErrorCollector, FileContext, FileDiagnostics};
pub use events::{LogEvent, LogLevel};
pub use service::{Logger, LoggingService, MemoryLogger, OutputFormat, StreamLogger};

static SERVICE: OnceLock<LoggingService> = OnceLock::new();
static COLLECTOR: OnceLock<ErrorCollector> = OnceLock::new();

thread_local! {
    static CURRENT_FILE: RefCell<Option<FileContext>> = const { RefCell::new(None) };
}

/// Install the service chosen by the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Invalid logging limits: {}", e))?;

    codes::ensure_registered(&[
        codes::system::INTERNAL_ERROR,
        codes::file_processing::FILE_NOT_FOUND,
        codes::lexical::READ_FAILURE,
        codes::syntax::KIND_MISMATCH,
    ])?;

    SERVICE
        .set(LoggingService::from_preferences())
        .map_err(|_| "Logging already initialized".to_string())?;
    COLLECTOR
        .set(ErrorCollector::new())
        .map_err(|_| "Error collector already initialized".to_string())?;

    log_success_with_context(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Box compiler logging initialized",
        vec![],
    );
    Ok(())
}

pub fn is_initialized() -> bool {
    SERVICE.get().is_some() && COLLECTOR.get().is_some()
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    COLLECTOR.get()
}

/// Run `f` with events on this thread attributed to `file_path`.
/// The previous attribution is restored afterwards.
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let context = FileContext::new(file_path, file_id);
    let previous = CURRENT_FILE.with(|current| current.replace(Some(context)));
    let result = f();
    CURRENT_FILE.with(|current| *current.borrow_mut() = previous);
    result
}

pub fn get_current_file_context() -> Option<FileContext> {
    CURRENT_FILE.with(|current| current.borrow().clone())
}

/// Attach context, forward to the service, and keep errors and warnings per file
fn emit(mut event: LogEvent, context: Vec<(&str, &str)>) {
    for (key, value) in context {
        event = event.with_context(key, value);
    }

    let file = get_current_file_context();
    if let (Some(file), true) = (&file, config::include_file_context()) {
        event = event
            .with_context("file", &file.file_path.display().to_string())
            .with_context("file_id", &file.file_id.to_string());
    }

    if let Some(service) = SERVICE.get() {
        service.log_event(event.clone());
    }

    if event.is_error() || event.is_warning() {
        if let (Some(file), Some(collector)) = (file, COLLECTOR.get()) {
            collector.record_event(&file.file_path, event);
        }
    }
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, config::clip_message(message));
    if let Some(span) = span {
        event = event.with_span(span);
    }
    emit(event, context);
}

pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::warning(config::clip_message(message)), context);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::success(code, config::clip_message(message)), context);
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::info(config::clip_message(message)), context);
}

pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::debug(config::clip_message(message)), context);
}

/// Print the per-file report when cargo-style output is enabled
pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }

    if let Some(collector) = COLLECTOR.get() {
        let report = collector.render_report();
        if !report.trim().is_empty() {
            println!("{}", report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_initialized() {
        // Test threads race to install; either outcome leaves logging up
        let _ = init_global_logging();
        assert!(is_initialized());
    }

    #[test]
    fn test_file_context_is_scoped() {
        assert!(get_current_file_context().is_none());

        let answer = with_file_context(PathBuf::from("outer.box"), 1, || {
            with_file_context(PathBuf::from("inner.box"), 2, || {
                assert_eq!(get_current_file_context().map(|c| c.file_id), Some(2));
            });
            let restored = get_current_file_context().map(|c| c.file_path);
            assert_eq!(restored, Some(PathBuf::from("outer.box")));
            42
        });

        assert_eq!(answer, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_errors_are_collected_for_current_file() {
        ensure_initialized();
        let file_path = PathBuf::from("collected-errors-test.box");

        with_file_context(file_path.clone(), 7, || {
            log_error_with_context(
                codes::syntax::VALUE_MISMATCH,
                "Expected 'package', found 'class'",
                None,
                vec![("expected", "package")],
            );
            log_info_with_context("Scanning", vec![]);
        });

        let collected = try_get_global_error_collector()
            .and_then(|collector| collector.diagnostics(&file_path))
            .unwrap();
        assert_eq!(collected.events.len(), 1);
        assert_eq!(collected.error_count(), 1);
        let context = &collected.events[0].context;
        assert_eq!(context.get("expected").map(String::as_str), Some("package"));
    }
}
