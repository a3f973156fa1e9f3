//! Camera capture module
//!
//! Provides camera device detection, capture constraints, and the OpenCV
//! backed camera source.

pub mod config;
pub mod detection;
pub mod device;
pub mod info;

pub use config::{CaptureConstraints, FacingMode};
pub use detection::CameraDetection;
pub use device::{OpenCvCamera, OpenCvStream};
pub use info::CameraInfo;
