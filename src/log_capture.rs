//! In-GUI log capture.
//!
//! Everything logged through the `log` facade also lands in a bounded
//! in-memory buffer that the setup panel renders at the bottom of the
//! window, so stream-thread warnings are visible without a terminal.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local};
use egui::Color32;
use log::{Level, Log, Metadata, Record};

const MAX_LOG_ENTRIES: usize = 1000;

/// A single captured log record.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    /// Display color for the entry's level.
    pub fn color(&self) -> Color32 {
        match self.level {
            Level::Error => Color32::from_rgb(255, 100, 100),
            Level::Warn => Color32::from_rgb(255, 255, 100),
            Level::Info => Color32::from_rgb(100, 200, 255),
            Level::Debug => Color32::from_rgb(150, 150, 150),
            Level::Trace => Color32::from_rgb(200, 150, 255),
        }
    }
}

/// Thread-safe, fixed-capacity ring of recent log entries.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<VecDeque<LogEntry>>>);

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        // Entries are plain data; a poisoned lock is still usable.
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn read(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.lock()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}

/// `log::Log` implementation feeding a [`LogBuffer`].
///
/// Captures every level; the panel does its own filtering.
pub struct LogCollector {
    buffer: LogBuffer,
}

impl LogCollector {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl Log for LogCollector {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.buffer.push(LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: format!("{}", record.args()),
        });
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: Local::now(),
            level: Level::Info,
            target: "test".into(),
            message: message.into(),
        }
    }

    #[test]
    fn buffer_drops_oldest_past_capacity() {
        let buffer = LogBuffer::new();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            buffer.push(entry(&format!("msg {i}")));
        }
        let entries = buffer.read();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries.front().map(|e| e.message.as_str()), Some("msg 5"));
    }

    #[test]
    fn clear_empties_the_buffer() {
        let buffer = LogBuffer::new();
        buffer.push(entry("hello"));
        buffer.clear();
        assert!(buffer.read().is_empty());
    }
}
