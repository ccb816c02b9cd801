//! Structured logging boundary contract.

use serde_json::Value;
use std::collections::BTreeMap;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Warn.
    Warn,
    /// Error.
    Error,
}

impl LogLevel {
    /// Lowercase level name used in log lines and config.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a level name (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Additional event fields.
pub type LogFields = BTreeMap<Box<str>, Value>;

/// Structured log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Stable event name.
    pub event: Box<str>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: Box<str>,
    /// Optional structured fields.
    pub fields: Option<LogFields>,
}

/// Boundary contract for structured logging.
pub trait LoggerPort: Send + Sync {
    /// Emit a structured event.
    fn log(&self, event: LogEvent);

    /// Convenience: debug event.
    fn debug(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            event: event.into(),
            level: LogLevel::Debug,
            message: message.into(),
            fields,
        });
    }

    /// Convenience: info event.
    fn info(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            event: event.into(),
            level: LogLevel::Info,
            message: message.into(),
            fields,
        });
    }

    /// Convenience: warn event.
    fn warn(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            event: event.into(),
            level: LogLevel::Warn,
            message: message.into(),
            fields,
        });
    }
}

/// Logger that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}
}

/// Build a field map from `(key, value)` pairs.
pub fn log_fields<I, K, V>(entries: I) -> LogFields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Box<str>>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
