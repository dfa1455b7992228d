//! Combat logger with verbosity levels and in-memory capture
//!
//! Messages go to stdout, to an in-memory buffer, or both. Captured entries
//! use owned strings and are exposed through a guard type for iteration,
//! so tests can assert on what the engine narrated.

use crate::game::CombatEvent;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for combat output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - only encounter outcome
    Minimal = 1,
    /// Normal - turns and state-change events (default)
    #[default]
    Normal = 2,
    /// Verbose - every enemy step and hook call
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A log entry with owned strings (no lifetime parameters)
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Verbosity level of this log entry
    pub level: VerbosityLevel,
    /// Log message (owned)
    pub message: String,
    /// Optional category (e.g., "event", "enemy_step")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for combat narration and events
///
/// Logging takes `&self`; the capture buffer uses interior mutability so
/// read-only code paths (queries, random target selection) can log too.
pub struct CombatLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Captured log entries (owned strings)
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl CombatLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        CombatLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to the in-memory buffer only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Print buffered logs to stdout (respecting verbosity) and clear the buffer
    pub fn flush_buffer(&mut self) {
        let buffer = self.log_buffer.borrow();
        for entry in buffer.iter() {
            if entry.level <= self.verbosity {
                self.log_to_stdout(entry.level, &entry.message);
            }
        }
        drop(buffer);
        self.clear_logs();
    }

    /// Print only the last `tail_lines` buffered logs, then clear the buffer
    pub fn flush_tail(&mut self, tail_lines: usize) {
        let buffer = self.log_buffer.borrow();

        let total_lines = buffer.len();
        let elided_count = total_lines.saturating_sub(tail_lines);
        if elided_count > 0 {
            println!(
                ">>> {} LOG LINES ELIDED. PRINTING LAST {} LINES <<<",
                elided_count, tail_lines
            );
        }

        for entry in buffer.iter().skip(elided_count) {
            if entry.level <= self.verbosity {
                self.log_to_stdout(entry.level, &entry.message);
            }
        }

        drop(buffer);
        self.clear_logs();
    }

    /// Get access to captured log entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    #[inline]
    fn log_to_stdout(&self, level: VerbosityLevel, message: &str) {
        if level == VerbosityLevel::Minimal {
            println!("{}", message);
        } else {
            println!("  {}", message);
        }
    }

    fn record(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        // Early exit if message won't be used
        if level > self.verbosity && !should_capture {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        if should_output && level <= self.verbosity {
            self.log_to_stdout(level, message);
        }
    }

    /// Log at Minimal level
    #[inline]
    pub fn minimal(&self, message: &str) {
        self.record(VerbosityLevel::Minimal, message, None);
    }

    /// Log at Normal level
    #[inline]
    pub fn normal(&self, message: &str) {
        self.record(VerbosityLevel::Normal, message, None);
    }

    /// Log at Verbose level
    #[inline]
    pub fn verbose(&self, message: &str) {
        self.record(VerbosityLevel::Verbose, message, None);
    }

    /// Log a combat event at Normal level
    ///
    /// Text output uses the event's `Display`; JSON output writes one
    /// object per line.
    pub fn event(&self, event: &CombatEvent) {
        if VerbosityLevel::Normal > self.verbosity && !self.is_capturing() {
            return;
        }
        let message = match self.output_format {
            OutputFormat::Text => event.to_string(),
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(json) => json,
                Err(e) => format!("{{\"error\":\"{}\"}}", e),
            },
        };
        self.record(VerbosityLevel::Normal, &message, Some("event"));
    }
}

impl Default for CombatLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CombatLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for CombatLogger {
    // Settings are cloned; captured entries are not
    fn clone(&self) -> Self {
        CombatLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CombatantRef;

    #[test]
    fn test_logger_creation() {
        let logger = CombatLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);

        let silent = CombatLogger::with_verbosity(VerbosityLevel::Silent);
        assert_eq!(silent.verbosity(), VerbosityLevel::Silent);
    }

    #[test]
    fn test_log_capture() {
        let mut logger = CombatLogger::new();
        logger.enable_capture();

        logger.normal("test message");
        logger.minimal("minimal message");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].message, "minimal message");
    }

    #[test]
    fn test_capture_records_above_verbosity() {
        let mut logger = CombatLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.enable_capture();

        logger.verbose("detail");
        let logs = logger.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, VerbosityLevel::Verbose);
    }

    #[test]
    fn test_event_formats() {
        let mut logger = CombatLogger::new();
        logger.enable_capture();

        let event = CombatEvent::BlockChanged {
            target: CombatantRef::Player,
            old: 0,
            new: 5,
        };
        logger.event(&event);
        logger.set_output_format(OutputFormat::Json);
        logger.event(&event);

        let logs = logger.logs();
        assert_eq!(logs[0].message, "player block 0 -> 5");
        assert_eq!(logs[0].category.as_deref(), Some("event"));
        assert!(logs[1].message.starts_with("{\"event\":\"BlockChanged\""));
    }

    #[test]
    fn test_flush_buffer() {
        let mut logger = CombatLogger::new();
        logger.enable_capture();

        logger.normal("message 1");
        logger.normal("message 2");
        assert_eq!(logger.logs().len(), 2);

        logger.flush_buffer();
        assert_eq!(logger.logs().len(), 0);
    }

    #[test]
    fn test_flush_tail() {
        let mut logger = CombatLogger::new();
        logger.enable_capture();
        for i in 0..10 {
            logger.normal(&format!("line {}", i));
        }
        logger.flush_tail(3);
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_disable_capture() {
        let mut logger = CombatLogger::new();
        logger.enable_capture();
        assert!(logger.is_capturing());

        logger.disable_capture();
        assert!(!logger.is_capturing());
    }
}
