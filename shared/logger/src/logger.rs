//! Thread-safe logger front end.
//!
//! This module provides the main [`Logger`] interface. Logging never blocks
//! the caller on file I/O: file records are handed to a writer thread.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::sink::{LogCapture, Sink};
use std::path::PathBuf;

/// Thread-safe, non-blocking logger.
///
/// Cloneable instances share the same sink. Component loggers created with
/// [`Logger::for_component`] share it too, so one file carries every layer.
///
/// # Examples
///
/// ```
/// use logging::{Logger, LogLevel};
///
/// let logger = Logger::console(LogLevel::Info).for_component("Scanner");
/// logger.info("Camera opened");
/// logger.debug("not printed at Info");
/// ```
#[derive(Clone)]
pub struct Logger {
    sink: Sink,
    level: LogLevel,
    component: Option<String>,
    echo_console: bool,
}

impl Logger {
    /// Creates a file logger with a dedicated writer thread.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn new(log_path: PathBuf, level: LogLevel) -> Result<Self> {
        Self::with_component(log_path, level, None, false)
    }

    /// Creates a file logger tagged with a component name, optionally
    /// echoing every record to stdout as well.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn with_component(
        log_path: PathBuf,
        level: LogLevel,
        component: Option<&str>,
        echo_console: bool,
    ) -> Result<Self> {
        Ok(Logger {
            sink: Sink::file(&log_path)?,
            level,
            component: component.map(str::to_string),
            echo_console,
        })
    }

    /// Creates a logger that only prints to stdout.
    pub fn console(level: LogLevel) -> Self {
        Logger {
            sink: Sink::Console,
            level,
            component: None,
            echo_console: false,
        }
    }

    /// Creates a logger that keeps records in memory, returning the buffer.
    pub fn capture(level: LogLevel) -> (Self, LogCapture) {
        let capture = LogCapture::default();
        let logger = Logger {
            sink: Sink::Capture(capture.clone()),
            level,
            component: None,
            echo_console: false,
        };
        (logger, capture)
    }

    /// Returns a logger for another component sharing this logger's sink.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            component: Some(component.to_string()),
            ..self.clone()
        }
    }

    /// Logs a debug message (only if level is Debug).
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Logs an info message (only if level is Info or lower).
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Logs a warning message (only if level is Warn or lower).
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Logs an error message (always recorded).
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }
        let msg = LogMessage::new(level, self.component.clone(), message.to_string());
        if self.echo_console && !matches!(self.sink, Sink::Console) {
            println!("{}", msg.format_line());
        }
        self.sink.deliver(&msg);
    }
}
