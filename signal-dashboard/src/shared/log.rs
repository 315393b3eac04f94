/// Dashboard log lines
///
/// Lines are produced by the stream dispatcher and by the REST panels, and are
/// mirrored to `tracing` so the log file carries the same history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Default number of lines retained before the oldest are dropped
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Severity of a dashboard log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Ok,
    Warn,
    Bad,
}

impl LogLevel {
    /// Lenient parse of a server-supplied level; anything unknown is `Info`.
    pub fn parse(level: &str) -> Self {
        match level.trim().to_lowercase().as_str() {
            "ok" => LogLevel::Ok,
            "warn" => LogLevel::Warn,
            "bad" => LogLevel::Bad,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Ok => "OK",
            LogLevel::Warn => "WARN",
            LogLevel::Bad => "BAD",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single timestamped line in the dashboard log panel
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Ok, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    /// Timestamp as shown in the panel, eg/ `2024-05-01 12:30:00.123`
    pub fn timestamp(&self) -> String {
        self.time.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

/// Bounded, newest-first log history
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// Prepend a line, dropping the oldest once full
    pub fn push(&mut self, line: LogLine) {
        match line.level {
            LogLevel::Warn | LogLevel::Bad => warn!(level = %line.level, "{}", line.message),
            LogLevel::Info | LogLevel::Ok => info!(level = %line.level, "{}", line.message),
        }

        self.lines.push_front(line);
        self.lines.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn latest(&self) -> Option<&LogLine> {
        self.lines.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_falls_back_to_info() {
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("BAD"), LogLevel::Bad);
        assert_eq!(LogLevel::parse("ok"), LogLevel::Ok);
        assert_eq!(LogLevel::parse("debug"), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Info);
    }

    #[test]
    fn test_buffer_is_newest_first_and_bounded() {
        let mut buffer = LogBuffer::with_capacity(2);
        buffer.push(LogLine::info("first"));
        buffer.push(LogLine::ok("second"));
        buffer.push(LogLine::warn("third"));

        let messages: Vec<&str> = buffer.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "second"]);
        assert_eq!(buffer.latest().map(|l| l.level), Some(LogLevel::Warn));
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = LogBuffer::default();
        buffer.push(LogLine::info("line"));
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
