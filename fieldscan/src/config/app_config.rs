//! Application Configuration
//!
//! Maps `fieldscan.conf` entries onto logger and scan loop settings.

use config_loader::{ConfigEntry, ConfigError};
use logging::LogLevel;
use media::FacingMode;
use media::common::constants::capture::MAX_DIMENSION;
use scanner::ScanSettings;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name used for config lookup (`FIELDSCAN_CONFIG`, `~/.config/fieldscan/`)
pub const APP_NAME: &str = "fieldscan";
/// Default config file name
pub const CONFIG_FILE: &str = "fieldscan.conf";

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the log file
    pub log_path: PathBuf,
    /// Logging level
    pub log_level: LogLevel,
    /// Echo log records to stdout
    pub log_console: bool,
    /// Scan loop timing and capture constraints
    pub scan: ScanSettings,
    /// Show the camera preview window
    pub preview: bool,
    /// Restart the camera after every detection
    pub continuous: bool,
    /// Keys present in the file but not understood
    pub unknown_keys: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("fieldscan.log"),
            log_level: LogLevel::Info,
            log_console: false,
            scan: ScanSettings::default(),
            preview: true,
            continuous: false,
            unknown_keys: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from an explicit path
    pub fn load_from_file(path: &Path) -> config_loader::Result<Self> {
        let content = config_loader::load_config_file(path)?;
        Self::from_content(&content)
    }

    /// Searches the usual locations, falling back to defaults when no file
    /// exists. Returns the path that was used, if any.
    pub fn load() -> config_loader::Result<(Self, Option<PathBuf>)> {
        match config_loader::find_config_file(APP_NAME, CONFIG_FILE) {
            Ok(path) => {
                let config = Self::load_from_file(&path)?;
                Ok((config, Some(path)))
            }
            Err(ConfigError::FileNotFound(_)) => Ok((Self::default(), None)),
            Err(e) => Err(e),
        }
    }

    /// Parses `key=value` content
    ///
    /// Format:
    /// ```text
    /// log_path=fieldscan.log
    /// log_level=info
    /// facing=environment
    /// sample_interval_ms=100
    /// continuous=true
    /// ```
    pub fn from_content(content: &str) -> config_loader::Result<Self> {
        let mut config = Self::default();

        for entry in config_loader::parse_entries(content)? {
            config.apply(&entry)?;
        }

        Ok(config)
    }

    fn apply(&mut self, entry: &ConfigEntry) -> config_loader::Result<()> {
        let constraints = &mut self.scan.constraints;

        match entry.key.as_str() {
            "log_path" => self.log_path = PathBuf::from(&entry.value),
            "log_level" => self.log_level = entry.parse()?,
            "log_console" => self.log_console = entry.parse_bool()?,
            "device_id" => constraints.device_id = Some(entry.parse()?),
            "ideal_width" => constraints.ideal_width = dimension(entry)?,
            "ideal_height" => constraints.ideal_height = dimension(entry)?,
            "facing" => constraints.facing = entry.parse::<FacingMode>()?,
            "sample_interval_ms" => self.scan.sample_interval = millis(entry)?,
            "debounce_ms" => self.scan.debounce_window = millis(entry)?,
            "restart_delay_ms" => self.scan.restart_delay = millis(entry)?,
            "refresh_hz" => {
                self.scan.frame_interval =
                    ScanSettings::frame_interval_for(entry.parse()?).map_err(|_| invalid(entry))?;
            }
            "preview" => self.preview = entry.parse_bool()?,
            "continuous" => self.continuous = entry.parse_bool()?,
            _ => self.unknown_keys.push(entry.key.clone()),
        }

        Ok(())
    }
}

fn invalid(entry: &ConfigEntry) -> ConfigError {
    ConfigError::InvalidValue {
        key: entry.key.clone(),
        value: entry.value.clone(),
        line: entry.line,
    }
}

fn positive(entry: &ConfigEntry) -> config_loader::Result<u32> {
    match entry.parse::<u32>()? {
        0 => Err(invalid(entry)),
        value => Ok(value),
    }
}

fn millis(entry: &ConfigEntry) -> config_loader::Result<Duration> {
    positive(entry).map(|ms| Duration::from_millis(u64::from(ms)))
}

fn dimension(entry: &ConfigEntry) -> config_loader::Result<u32> {
    let value = positive(entry)?;
    if value > MAX_DIMENSION {
        return Err(invalid(entry));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_path, PathBuf::from("fieldscan.log"));
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.preview);
        assert!(!config.continuous);
        assert_eq!(config.scan, ScanSettings::default());
    }

    #[test]
    fn test_load_from_content() {
        let content = "\
            # Field tablet\n\
            log_path=/tmp/fieldscan-test.log\n\
            log_level=debug\n\
            log_console=yes\n\
            device_id=2\n\
            ideal_width=1920\n\
            ideal_height=1080\n\
            facing=front\n\
            sample_interval_ms=200\n\
            debounce_ms=1500\n\
            restart_delay_ms=750\n\
            refresh_hz=30\n\
            preview=off\n\
            continuous=true\n\
        ";

        let config = AppConfig::from_content(content).unwrap();
        assert_eq!(config.log_path, PathBuf::from("/tmp/fieldscan-test.log"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.log_console);
        assert_eq!(config.scan.constraints.device_id, Some(2));
        assert_eq!(config.scan.constraints.ideal_width, 1920);
        assert_eq!(config.scan.constraints.ideal_height, 1080);
        assert_eq!(config.scan.constraints.facing, FacingMode::User);
        assert_eq!(config.scan.sample_interval, Duration::from_millis(200));
        assert_eq!(config.scan.debounce_window, Duration::from_millis(1500));
        assert_eq!(config.scan.restart_delay, Duration::from_millis(750));
        assert_eq!(config.scan.frame_interval, Duration::from_secs(1) / 30);
        assert!(!config.preview);
        assert!(config.continuous);
        assert!(config.unknown_keys.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let config = AppConfig::from_content("server_address=127.0.0.1\n").unwrap();
        assert_eq!(config.unknown_keys, vec!["server_address".to_string()]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = AppConfig::from_content("\nsample_interval_ms=0\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "sample_interval_ms".to_string(),
                value: "0".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(AppConfig::from_content("debounce_ms=soon").is_err());
        assert!(AppConfig::from_content("facing=sideways").is_err());
        assert!(AppConfig::from_content("ideal_width=100000").is_err());
        assert!(AppConfig::from_content("log_level=loud").is_err());
        assert!(AppConfig::from_content("preview=maybe").is_err());
        assert!(AppConfig::from_content("refresh_hz=0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "continuous=1\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert!(config.continuous);
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let config = AppConfig::from_content(include_str!("../../fieldscan.conf.example")).unwrap();
        assert!(config.unknown_keys.is_empty());
        assert_eq!(config.scan.sample_interval, ScanSettings::default().sample_interval);
        assert_eq!(config.scan.constraints, ScanSettings::default().constraints);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/fieldscan.conf"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
