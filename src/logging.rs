//! Injected application logger.
//!
//! The logger is constructed once at application bootstrap and passed by
//! reference to the services that need it; there is no ambient global
//! logger state. Records carry a per-session correlation id so a support
//! trace can be stitched back together across requests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use uuid::Uuid;

/// Severity level of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A structured log record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Component that produced the record (e.g. "LeadService").
    pub component: String,
    pub message: String,
    /// Optional structured detail (validation payload, stack trace, ...).
    pub detail: Option<String>,
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Trait for receiving log records.
///
/// Implementations must be fast and non-blocking; failure to record must
/// not affect the operation that produced the record.
pub trait LogSink: Send + Sync {
    fn record(&self, record: LogRecord);
}

/// Default sink forwarding records to the `log` facade.
#[derive(Clone, Default)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn record(&self, record: LogRecord) {
        let session = record.session_id.simple().to_string();
        let suffix = match &record.detail {
            Some(detail) => format!(" | {}", detail),
            None => String::new(),
        };
        match record.level {
            LogLevel::Debug => debug!(
                "[{}][session:{}] {}{}",
                record.component,
                &session[..8],
                record.message,
                suffix
            ),
            LogLevel::Info => info!(
                "[{}][session:{}] {}{}",
                record.component,
                &session[..8],
                record.message,
                suffix
            ),
            LogLevel::Warn => warn!(
                "[{}][session:{}] {}{}",
                record.component,
                &session[..8],
                record.message,
                suffix
            ),
            LogLevel::Error => error!(
                "[{}][session:{}] {}{}",
                record.component,
                &session[..8],
                record.message,
                suffix
            ),
        }
    }
}

/// Mock sink for testing - collects emitted records.
#[derive(Clone, Default)]
pub struct MockLogSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MockLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl LogSink for MockLogSink {
    fn record(&self, record: LogRecord) {
        self.records.lock().unwrap().push(record);
    }
}

/// Application logger with a session correlation id.
///
/// Create one per application session at bootstrap and share it via `Arc`.
pub struct AppLogger {
    session_id: Uuid,
    sink: Arc<dyn LogSink>,
}

impl AppLogger {
    /// Creates a logger with a fresh session id and the facade sink.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(FacadeSink))
    }

    /// Creates a logger with a fresh session id and the given sink.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            sink,
        }
    }

    /// The session correlation id attached to every record.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn emit(&self, level: LogLevel, component: &str, message: &str, detail: Option<String>) {
        self.sink.record(LogRecord {
            level,
            component: component.to_string(),
            message: message.to_string(),
            detail,
            session_id: self.session_id,
            timestamp: Utc::now(),
        });
    }

    pub fn debug(&self, component: &str, message: &str) {
        self.emit(LogLevel::Debug, component, message, None);
    }

    pub fn info(&self, component: &str, message: &str) {
        self.emit(LogLevel::Info, component, message, None);
    }

    pub fn warn(&self, component: &str, message: &str) {
        self.emit(LogLevel::Warn, component, message, None);
    }

    pub fn warn_with_detail(&self, component: &str, message: &str, detail: String) {
        self.emit(LogLevel::Warn, component, message, Some(detail));
    }

    pub fn error(&self, component: &str, message: &str) {
        self.emit(LogLevel::Error, component, message, None);
    }

    /// Records a catastrophic fault from a crashed subtree, once, with full
    /// structured context (component name, error message, stack detail).
    pub fn capture_crash(&self, component: &str, message: &str, stack: String) {
        self.emit(LogLevel::Error, component, message, Some(stack));
    }
}

impl Default for AppLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_carry_session_id() {
        let sink = MockLogSink::new();
        let logger = AppLogger::with_sink(Arc::new(sink.clone()));

        logger.info("LeadService", "fetched 2 leads");
        logger.warn("LeadService", "dropped invalid row");

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].session_id, logger.session_id());
        assert_eq!(records[0].session_id, records[1].session_id);
        assert_eq!(records[0].component, "LeadService");
    }

    #[test]
    fn test_crash_capture_is_logged_once_with_detail() {
        let sink = MockLogSink::new();
        let logger = AppLogger::with_sink(Arc::new(sink.clone()));

        logger.capture_crash(
            "ApplicationList",
            "render fault",
            "panicked at src/leads/leads_service.rs:42".to_string(),
        );

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Error);
        assert!(records[0].detail.as_deref().unwrap().contains("leads_service.rs:42"));
    }

    #[test]
    fn test_facade_sink_does_not_panic() {
        let logger = AppLogger::new();
        logger.debug("Test", "debug");
        logger.error("Test", "error");
    }
}
