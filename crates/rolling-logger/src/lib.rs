//! Rolling Logger
//!
//! A `tracing` layer that keeps the most recent log lines in a circular
//! buffer and echoes each line to the platform console (the browser
//! console on wasm, stderr elsewhere). The buffer backs the in-app
//! activity log.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::level_filters::{LevelFilter, ParseLevelFilterError};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{Layer, Registry};

/// Lines kept when the caller passes a capacity of zero
pub const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log level '{level}': {source}")]
    InvalidLevel {
        level: String,
        source: ParseLevelFilterError,
    },
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// One captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Bounded, shared store of recent records. Oldest lines are dropped first.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    records: Arc<Mutex<VecDeque<LogRecord>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, record: LogRecord) {
        let mut records = self.lock();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Snapshot, oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().iter().cloned().collect()
    }

    /// The last `n` records, oldest first
    pub fn tail(&self, n: usize) -> Vec<LogRecord> {
        let records = self.lock();
        records.iter().skip(records.len().saturating_sub(n)).cloned().collect()
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
}

/// Collects the `message` field and appends the rest as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.trim_start().to_string(),
            (false, false) => format!("{}{}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Layer feeding a `LogBuffer`
pub struct RollingLayer {
    app_name: String,
    buffer: LogBuffer,
    echo: bool,
}

impl RollingLayer {
    pub fn new(app_name: impl Into<String>, buffer: LogBuffer) -> Self {
        Self {
            app_name: app_name.into(),
            buffer,
            echo: true,
        }
    }

    /// Capture only, no console output
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    fn emit(&self, record: &LogRecord) {
        let line = format!("[{}] {}", self.app_name, record);
        console::write(record.level, &line);
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            timestamp: Utc::now(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        };
        if self.echo {
            self.emit(&record);
        }
        self.buffer.push(record);
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use tracing::Level;
    use wasm_bindgen::JsValue;

    pub fn write(level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use tracing::Level;

    pub fn write(_level: Level, line: &str) {
        eprintln!("{line}");
    }
}

/// Install the rolling layer as the global subscriber.
///
/// `level` is a `tracing` level name ("error" .. "trace", or "off").
/// Returns the buffer the layer writes into.
pub fn init_logger(app_name: &str, level: &str, capacity: usize) -> Result<LogBuffer, LoggerError> {
    let filter: LevelFilter = level.trim().parse().map_err(|source| LoggerError::InvalidLevel {
        level: level.to_string(),
        source,
    })?;

    let buffer = LogBuffer::new(capacity);
    let layer = RollingLayer::new(app_name, buffer.clone()).with_filter(filter);
    Registry::default().with(layer).try_init()?;

    tracing::info!(app = app_name, %filter, capacity = buffer.capacity(), "Logger initialized");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn capture(capacity: usize, filter: LevelFilter, f: impl FnOnce()) -> LogBuffer {
        let buffer = LogBuffer::new(capacity);
        let layer = RollingLayer::new("test", buffer.clone()).without_echo().with_filter(filter);
        tracing::subscriber::with_default(Registry::default().with(layer), f);
        buffer
    }

    #[test]
    fn test_captures_message_and_fields() {
        let buffer = capture(10, LevelFilter::DEBUG, || {
            tracing::info!(pool = "global", count = 3, "Loaded inventory");
        });

        let records = buffer.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::INFO);
        assert_eq!(records[0].message, "Loaded inventory pool=global count=3");
        assert!(records[0].to_string().contains(" INFO "));
    }

    #[test]
    fn test_drops_oldest_when_full() {
        let buffer = capture(3, LevelFilter::TRACE, || {
            for n in 0..5 {
                tracing::debug!("line {n}");
            }
        });

        let messages: Vec<String> = buffer.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.tail(1)[0].message, "line 4");
    }

    #[test]
    fn test_level_filter_applies() {
        let buffer = capture(10, LevelFilter::WARN, || {
            tracing::info!("hidden");
            tracing::warn!("shown");
            tracing::error!(error = "boom", "failed");
        });

        let messages: Vec<String> = buffer.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["shown", "failed error=boom"]);
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let buffer = LogBuffer::new(0);
        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = init_logger("test", "loud", 10).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel { .. }));
    }
}
