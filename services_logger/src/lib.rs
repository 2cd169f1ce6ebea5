//! # Logger Service
//!
//! The kernel's diagnostic log sink.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not printf-style. A module hands the
//! host a [`LogEntry`]; the host stamps it with the tick count and keeps it in
//! a bounded [`KernelLog`]. Turning entries into dmesg-looking text is a
//! rendering concern and happens at the edge.

use hal::Hz;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Default number of entries retained by a [`KernelLog`]
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "err",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Tick count when the host accepted the entry
    pub jiffies: u64,
    /// Log message
    pub message: String,
    /// Structured fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            jiffies: 0,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Shorthand for an Info entry
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    /// Shorthand for a Warn entry
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Stamps the entry with the tick count
    pub fn with_jiffies(mut self, jiffies: u64) -> Self {
        self.jiffies = jiffies;
        self
    }

    /// Looks up a structured field
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the entry as a dmesg line: `[ssssss.uuuuuu] message`
    ///
    /// The timestamp is time since `boot_jiffies` at rate `hz`.
    pub fn render(&self, boot_jiffies: u64, hz: Hz) -> String {
        let micros = hz.micros(self.jiffies.wrapping_sub(boot_jiffies));
        format!(
            "[{:>5}.{:06}] {}",
            micros / 1_000_000,
            micros % 1_000_000,
            self.message
        )
    }
}

/// Bounded ring of log entries
///
/// When full, the oldest entry is discarded and counted in
/// [`dropped`](KernelLog::dropped).
#[derive(Debug, Clone)]
pub struct KernelLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    dropped: u64,
}

impl KernelLog {
    /// Creates a log holding at most `capacity` entries (minimum one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    /// Appends an entry, evicting the oldest when full
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(entry);
    }

    /// Iterates over retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Removes and returns every retained entry
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }

    /// Messages of retained entries, oldest first
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries evicted because the ring was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for KernelLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
