//! Internal logging system for the Galaxy3D bridge
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error) with a global minimum
//! - Colored console output by default
//! - File and line information for detailed ERROR logs
//!
//! The binding layer logs resolution, singleton lookups and leaked handles.
//! The call dispatcher itself never logs (it sits on the hot path).

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route bridge logs into the host's own log sink.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_bridge::galaxy3d::log::{Logger, LogEntry};
///
/// struct HostConsole;
///
/// impl Logger for HostConsole {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{} {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "galaxy3d::BindingCache", "galaxy3d::native")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Very verbose information (every cache hit, every resolution)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (leaked handles, headless fallbacks)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry the way the console logger prints it (without colors)
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                entry.severity.label(),
                entry.source,
                entry.message,
                file,
                line
            ),
            _ => format!(
                "[{}] [{}] [{}] {}",
                timestamp,
                entry.severity.label(),
                entry.source,
                entry.message
            ),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let label = entry.severity.label();
        let severity_str = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            eprintln!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! bridge_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Bridge::log(
            $crate::galaxy3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
///
/// # Example
///
/// ```ignore
/// bridge_debug!("galaxy3d::SymbolResolver", "Resolved {}::{}", class, member);
/// ```
#[macro_export]
macro_rules! bridge_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Bridge::log(
            $crate::galaxy3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! bridge_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Bridge::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! bridge_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Bridge::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! bridge_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Bridge::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
