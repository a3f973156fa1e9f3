use crate::error::LoggingError;
use std::fmt;
use std::str::FromStr;

/// Severity level of a log message.
///
/// Ordered from lowest to highest: Debug < Info < Warn < Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Detailed debugging information (per-sample decisions).
    Debug,
    /// Lifecycle messages (camera opened, scan detected).
    Info,
    /// Recoverable problems (decoder faults, grab failures).
    Warn,
    /// Failures the caller has to act on.
    Error,
}

impl LogLevel {
    /// Returns the string representation of the log level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    /// Parses a log level from a string (case-insensitive, `warning` accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}
