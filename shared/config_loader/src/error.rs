use std::fmt;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while locating, reading or tokenizing a config file.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// No configuration file at the given path or search locations.
    FileNotFound(String),

    /// The file exists but could not be read.
    ReadError(String),

    /// A non-comment line without a `key=value` shape.
    Syntax { line: usize, content: String },

    /// A value that does not parse as the type its key expects.
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ReadError(msg) => {
                write!(f, "Failed to read configuration file: {}", msg)
            }
            ConfigError::Syntax { line, content } => {
                write!(f, "Line {}: expected key=value, got '{}'", line, content)
            }
            ConfigError::InvalidValue { key, value, line } => {
                write!(f, "Line {}: invalid value '{}' for '{}'", line, value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
