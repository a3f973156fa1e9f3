//! Thread-safe asynchronous logging library.
//!
//! Records go to a log file through a dedicated writer thread, to stdout,
//! or into an in-memory capture buffer that tests can inspect.

pub mod error;
mod log_level;
mod log_message;
mod logger;
mod sink;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use sink::LogCapture;
