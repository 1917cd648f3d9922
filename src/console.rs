// In-app console for log records.
// A `log` backend that keeps recent records in memory for the Console tab.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Oldest messages are dropped beyond this many.
const CAPACITY: usize = 500;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Level> for ConsoleLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => ConsoleLevel::Error,
            Level::Warn => ConsoleLevel::Warn,
            Level::Info => ConsoleLevel::Info,
            Level::Debug | Level::Trace => ConsoleLevel::Debug,
        }
    }
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Shared handle to the console's messages.
#[derive(Debug, Clone, Default)]
pub struct ConsoleBuffer {
    inner: Arc<Mutex<Buffer>>,
}

#[derive(Debug, Default)]
struct Buffer {
    messages: VecDeque<ConsoleMessage>,
    /// Total ever pushed, including dropped ones.
    pushed: usize,
}

impl ConsoleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Buffer> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, message: ConsoleMessage) {
        let mut buffer = self.lock();
        buffer.messages.push_back(message);
        buffer.pushed += 1;
        while buffer.messages.len() > CAPACITY {
            buffer.messages.pop_front();
        }
    }

    /// Copy of the retained messages, oldest first.
    pub fn snapshot(&self) -> Vec<ConsoleMessage> {
        self.lock().messages.iter().cloned().collect()
    }

    /// Number of messages ever pushed. Used to count unread messages.
    pub fn total(&self) -> usize {
        self.lock().pushed
    }
}

/// `log` backend writing into a [`ConsoleBuffer`].
///
/// Records from this crate are kept from `level` upward; records from
/// dependencies only from warnings upward.
pub struct ConsoleLogger {
    buffer: ConsoleBuffer,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(buffer: ConsoleBuffer, level: LevelFilter) -> Self {
        Self { buffer, level }
    }

    /// Install as the global logger.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let max = self.level.max(LevelFilter::Warn);
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max);
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.buffer.push(ConsoleMessage::new(
                record.level().into(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}
