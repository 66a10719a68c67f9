//! Logging service and its output backends

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level gate in front of one backend
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Pick the backend from the installed runtime preferences
    pub fn from_preferences() -> Self {
        let logger: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(MemoryLogger::new())
        } else if config::use_structured_logging() {
            Arc::new(StreamLogger::new(OutputFormat::Json))
        } else {
            Arc::new(StreamLogger::new(OutputFormat::Plain))
        };

        Self::new(logger, config::get_min_log_level())
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Writes errors to stderr and everything else to stdout
pub struct StreamLogger {
    format: OutputFormat,
}

impl StreamLogger {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn render(&self, event: &LogEvent) -> String {
        match self.format {
            OutputFormat::Plain => event.to_string(),
            OutputFormat::Json => event.to_json().unwrap_or_else(|_| event.to_string()),
        }
    }
}

impl Logger for StreamLogger {
    fn log(&self, event: &LogEvent) {
        let line = self.render(event);
        // A closed pipe must not abort the scan
        let _ = if event.is_error() {
            writeln!(std::io::stderr().lock(), "{}", line)
        } else {
            writeln!(std::io::stdout().lock(), "{}", line)
        };
    }
}

/// Ring buffer of recent events, bounded by the compile-time log buffer size
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_error_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether an event with this level and code was kept
    pub fn contains(&self, level: LogLevel, code: Code) -> bool {
        self.lock()
            .iter()
            .any(|event| event.level == level && event.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_drops_oldest() {
        let logger = MemoryLogger::with_capacity(2);

        logger.log(&LogEvent::info("scanning a.box"));
        logger.log(&LogEvent::error(codes::lexical::WORD_TOO_LONG, "Word too long"));
        logger.log(&LogEvent::warning("b.box has no declarations"));

        assert_eq!(logger.len(), 2);
        let messages: Vec<_> = logger.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["Word too long", "b.box has no declarations"]);
        assert!(logger.contains(LogLevel::Error, codes::lexical::WORD_TOO_LONG));

        logger.clear();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_service_filters_below_min_level() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Warning);

        service.log_event(LogEvent::debug("Classified word"));
        service.log_event(LogEvent::success(
            codes::success::FILE_PROCESSING_SUCCESS,
            "Opened main.box",
        ));
        service.log_event(LogEvent::warning("Input contained invalid UTF-8 sequences"));
        service.log_event(LogEvent::error(codes::syntax::KIND_MISMATCH, "Expected Identifier"));

        assert_eq!(logger.len(), 2);
        assert!(logger.contains(LogLevel::Error, codes::syntax::KIND_MISMATCH));
        assert!(!logger.contains(LogLevel::Info, codes::success::FILE_PROCESSING_SUCCESS));
    }

    #[test]
    fn test_stream_logger_renders_both_formats() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "missing.box")
            .with_context("file", "missing.box");

        assert_eq!(
            StreamLogger::new(OutputFormat::Plain).render(&event),
            "ERROR E005 missing.box"
        );
        assert!(StreamLogger::new(OutputFormat::Json)
            .render(&event)
            .starts_with('{'));
    }
}
