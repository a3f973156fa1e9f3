//! Error types for the scan loop.

use media::CameraError;
use std::fmt;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Why the scan loop could not start (or be configured)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Camera acquisition failed
    Camera(CameraError),
    /// The render surface cannot receive a stream
    Surface(String),
    /// Invalid scan settings
    Config(String),
}

impl ScanError {
    /// The camera failure behind this error, if any
    pub fn camera(&self) -> Option<&CameraError> {
        match self {
            ScanError::Camera(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Camera(err) => write!(f, "{}", err),
            ScanError::Surface(msg) => write!(f, "Render surface error: {}", msg),
            ScanError::Config(msg) => write!(f, "Scan settings error: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Camera(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CameraError> for ScanError {
    fn from(err: CameraError) -> Self {
        ScanError::Camera(err)
    }
}
