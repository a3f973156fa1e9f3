//! Error types for media operations.
//!
//! [`CameraError`] is the taxonomy a failed camera acquisition is reported
//! with; [`MediaError`] covers everything else in this crate.

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, MediaError>;

/// Why a camera could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user or the OS refused access to the device
    PermissionDenied(String),
    /// No matching capture hardware exists
    NotFound(String),
    /// The device exists but is busy or would not open
    Unavailable(String),
    /// Anything else
    Other(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "Camera permission denied: {}", msg),
            CameraError::NotFound(msg) => write!(f, "Camera not found: {}", msg),
            CameraError::Unavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::Other(msg) => write!(f, "Camera error: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<io::Error> for CameraError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            io::ErrorKind::NotFound => CameraError::NotFound(err.to_string()),
            _ => CameraError::Other(err.to_string()),
        }
    }
}

/// Error type for media operations
#[derive(Debug)]
pub enum MediaError {
    /// Configuration error
    Config(String),
    /// Camera acquisition or capture error
    Camera(CameraError),
    /// Frame buffer misuse (size mismatch, empty frame)
    Frame(String),
    /// OpenCV error
    OpenCv(opencv::Error),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Config(msg) => write!(f, "Config error: {}", msg),
            MediaError::Camera(err) => write!(f, "{}", err),
            MediaError::Frame(msg) => write!(f, "Frame error: {}", msg),
            MediaError::OpenCv(err) => write!(f, "OpenCV error: {}", err),
        }
    }
}

impl std::error::Error for MediaError {}

impl From<CameraError> for MediaError {
    fn from(err: CameraError) -> Self {
        MediaError::Camera(err)
    }
}

impl From<opencv::Error> for MediaError {
    fn from(err: opencv::Error) -> Self {
        MediaError::OpenCv(err)
    }
}
