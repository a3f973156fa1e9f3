//! Media Capture Module
//!
//! Camera capture and barcode decoding backends for the scan loop.
//! The traits in [`video::traits`] are the seams the scanner drives; the
//! OpenCV types implement them for real hardware.

pub mod common;
pub mod error;
pub mod video;

// Re-export commonly used types
pub use error::{CameraError, MediaError};

pub use video::{
    BarcodeDecoder, CameraDetection, CameraInfo, CameraSource, CaptureConstraints, CaptureStream,
    DecodeOutcome, FacingMode, OpenCvBarcodeDecoder, OpenCvCamera, OpenCvStream, RasterFrame,
    TrackInfo, TrackState,
};
