//! Structured JSON logger writing one line per event.

use fieldcheck_shared::{LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A sink that receives pre-formatted log lines.
pub trait LogSink: Send + Sync {
    /// Write a line to the sink.
    fn write_line(&self, line: &str);
}

/// Log sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn write_line(&self, line: &str) {
        let mut stderr = std::io::stderr();
        if let Err(error) = stderr.write_all(line.as_bytes()) {
            eprintln!("log sink write failed: {error}");
        }
    }
}

/// JSON logger emitting one line per event.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// JSON logger writing to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Arc::new(StderrLogSink))
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl std::fmt::Debug for JsonLogger {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("JsonLogger")
            .field("base_fields", &self.base_fields)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        let mut fields = self.base_fields.clone();
        if let Some(extra) = event.fields {
            fields.extend(extra);
        }

        let mut payload = serde_json::Map::new();
        payload.insert("timestampMs".to_string(), Value::from(now_epoch_ms()));
        payload.insert(
            "level".to_string(),
            Value::String(event.level.as_str().to_string()),
        );
        payload.insert("event".to_string(), Value::String(event.event.into_string()));
        payload.insert(
            "message".to_string(),
            Value::String(event.message.into_string()),
        );
        if !fields.is_empty() {
            payload.insert("fields".to_string(), fields_to_json(fields));
        }

        let line = serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        );
        self.sink.write_line(&line);
    }
}

fn fields_to_json(fields: LogFields) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(key, value)| (key.into_string(), value))
            .collect(),
    )
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
