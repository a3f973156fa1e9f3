//! Error types for logging operations.

use std::fmt;
use std::io;

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Errors that can occur during logging.
#[derive(Debug)]
pub enum LoggingError {
    /// I/O error from file operations.
    Io(io::Error),
    /// A log level string that is not one of debug/info/warn/error.
    InvalidLevel(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::Io(err) => write!(f, "I/O error: {}", err),
            LoggingError::InvalidLevel(level) => write!(f, "Invalid log level: '{}'", level),
        }
    }
}

impl std::error::Error for LoggingError {}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> Self {
        LoggingError::Io(err)
    }
}
