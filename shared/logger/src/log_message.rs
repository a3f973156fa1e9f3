//! Internal log record structure.

use crate::log_level::LogLevel;
use chrono::Local;

/// A single formatted-on-demand log record.
#[derive(Debug, Clone)]
pub(crate) struct LogMessage {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogMessage {
    /// Creates a record stamped with the current local time.
    pub fn new(level: LogLevel, component: Option<String>, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component,
            message,
        }
    }

    /// Formats as `[timestamp] LEVEL [Component]: message` without newline.
    pub fn format_line(&self) -> String {
        match self.component {
            Some(ref component) => format!(
                "[{}] {} [{}]: {}",
                self.timestamp,
                self.level.as_str(),
                component,
                self.message
            ),
            None => format!(
                "[{}] {}: {}",
                self.timestamp,
                self.level.as_str(),
                self.message
            ),
        }
    }
}
