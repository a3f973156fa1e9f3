//! Configuration Module
//!
//! Command-line options and the `fieldscan.conf` settings file.

mod app_config;
mod options;

pub use app_config::AppConfig;
pub use options::{Options, USAGE};
