//! # Config Loader
//!
//! Locates, reads and tokenizes `key=value` configuration files.
//!
//! ```no_run
//! use config_loader::{find_and_load, parse_entries};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = find_and_load("fieldscan", "fieldscan.conf")?;
//!     for entry in parse_entries(&content)? {
//!         println!("{} = {}", entry.key, entry.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One `key=value` line of a configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    /// 1-based line number, for error messages.
    pub line: usize,
}

impl ConfigEntry {
    /// Parses the value as `T`, reporting the key and line on failure.
    pub fn parse<T: FromStr>(&self) -> Result<T> {
        self.value.parse().map_err(|_| ConfigError::InvalidValue {
            key: self.key.clone(),
            value: self.value.clone(),
            line: self.line,
        })
    }

    /// Parses `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn parse_bool(&self) -> Result<bool> {
        match self.value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: self.key.clone(),
                value: self.value.clone(),
                line: self.line,
            }),
        }
    }
}

/// Reads a configuration file into a String without interpreting it.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))
}

/// Searches common locations for `filename`.
///
/// Order:
/// 1. Environment variable `<APP>_CONFIG` (e.g. `FIELDSCAN_CONFIG`)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
/// 4. `<user config dir>/{app}/{filename}`
pub fn find_config_file(app: &str, filename: &str) -> Result<PathBuf> {
    let env_key = format!("{}_CONFIG", app.to_uppercase());
    if let Ok(path) = env::var(&env_key) {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        }
    }

    let candidates = [
        PathBuf::from("./config").join(filename),
        PathBuf::from("./").join(filename),
    ];
    if let Some(found) = candidates.into_iter().find(|p| p.exists()) {
        return Ok(found);
    }

    if let Some(user_dir) = dirs::config_dir() {
        let path = user_dir.join(app).join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found. Searched: {} env var, ./config/{}, ./{}, <config dir>/{}/{}",
        filename, env_key, filename, filename, app, filename
    )))
}

/// Finds and reads a configuration file in one step.
pub fn find_and_load(app: &str, filename: &str) -> Result<String> {
    let path = find_config_file(app, filename)?;
    load_config_file(path)
}

/// Splits `key=value` content into entries.
///
/// Blank lines and lines starting with `#` are skipped. Keys and values are
/// trimmed; a value may itself contain `=`.
pub fn parse_entries(content: &str) -> Result<Vec<ConfigEntry>> {
    let mut entries = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => entries.push(ConfigEntry {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
                line: index + 1,
            }),
            _ => {
                return Err(ConfigError::Syntax {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    Ok(entries)
}
