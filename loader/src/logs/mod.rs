//! Pipeline events and the observers that report them.
//!
//! The reader, loader and pipeline never log directly. They emit an
//! [`Event`] to an [`Observer`] handed in by the caller; [`ConsoleLog`]
//! prints them and can mirror them to a log file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::models::Target;

/// Points in a run at which observers are notified.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Run started for a file and destination.
    Started { path: PathBuf, target: Target },
    /// Source file read and transformed.
    RowsRead { count: usize },
    /// About to open the store connection. `uri` is already redacted.
    Connecting { target: Target, uri: String },
    /// Insert call returned successfully.
    InsertComplete { count: usize },
    /// Connected, but the batch was empty so no insert was sent.
    NothingToInsert { target: Target },
    /// Run aborted.
    Failed { kind: ErrorKind, message: String },
}

impl Event {
    pub fn to_entry(&self) -> LogEntry {
        match self {
            Event::Started { path, target } => LogEntry::info(format!(
                "Loading {} into {}",
                path.display(),
                target
            )),
            Event::RowsRead { count } => {
                LogEntry::success(format!("Converted CSV to {} JSON records", count))
            }
            Event::Connecting { target, uri } => {
                LogEntry::info(format!("Connecting to {} ({})", uri, target)).with_indent(1)
            }
            Event::InsertComplete { count } => {
                LogEntry::success(format!("Inserted {} records", count))
            }
            Event::NothingToInsert { target } => {
                LogEntry::warning(format!("No records to insert into {}", target))
            }
            Event::Failed { kind, message } => {
                LogEntry::error(format!("{} failure: {}", kind.as_str(), message))
            }
        }
    }
}

/// Receives pipeline events.
pub trait Observer {
    fn notify(&self, event: &Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&self, _event: &Event) {}
}

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn label(&self) -> &'static str {
        match self {
            LogLevel::Info | LogLevel::Success => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for console output
    #[serde(default)]
    pub indent: u8,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Console form: indented, level prefix.
    pub fn console_line(&self) -> String {
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, self.level.prefix(), self.message)
    }

    /// File form: `<timestamp> - <LEVEL> - <message>`.
    pub fn file_line(&self) -> String {
        format!(
            "{} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
            self.level.label(),
            self.message
        )
    }
}

/// Prints events to stderr and optionally appends them to a file.
pub struct ConsoleLog {
    file: Option<Mutex<File>>,
    quiet: bool,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self {
            file: None,
            quiet: false,
        }
    }

    /// Also append every entry to `path`, creating it if needed.
    pub fn with_file(mut self, path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.file = Some(Mutex::new(file));
        Ok(self)
    }

    /// Skip console output, keep the file sink.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn log(&self, entry: &LogEntry) {
        if !self.quiet {
            eprintln!("{}", entry.console_line());
        }

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // Losing a log line must not abort the load
                let _ = writeln!(file, "{}", entry.file_line());
            }
        }
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ConsoleLog {
    fn notify(&self, event: &Event) {
        self.log(&event.to_entry());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_entries() {
        let entry = Event::RowsRead { count: 11055 }.to_entry();
        assert_eq!(entry.level, LogLevel::Success);
        assert_eq!(entry.message, "Converted CSV to 11055 JSON records");

        let entry = Event::Failed {
            kind: ErrorKind::Connection,
            message: "timed out".into(),
        }
        .to_entry();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.message, "connection failure: timed out");
    }

    #[test]
    fn test_empty_batch_is_a_warning() {
        let entry = Event::NothingToInsert {
            target: Target::new("network_security", "phishing_data"),
        }
        .to_entry();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "No records to insert into network_security.phishing_data");
        assert!(entry.file_line().contains(" - WARNING - No records to insert"));
    }

    #[test]
    fn test_console_line_indent() {
        let entry = LogEntry::info("nested").with_indent(2);
        assert_eq!(entry.console_line(), format!("{}nested", " ".repeat(10)));
    }

    #[test]
    fn test_file_line_format() {
        let line = LogEntry::warning("careful").file_line();
        assert!(line.ends_with(" - WARNING - careful"));
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("load.log");

        let log = ConsoleLog::new().with_file(&path).unwrap().quiet(true);
        log.notify(&Event::RowsRead { count: 2 });
        log.notify(&Event::InsertComplete { count: 2 });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO - Converted CSV to 2 JSON records"));
        assert!(lines[1].ends_with("INFO - Inserted 2 records"));
    }
}
