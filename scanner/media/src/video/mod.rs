//! Video capture and decoding module
//!
//! Handles camera capture, the raster frames handed to decoders, and the
//! barcode decoder itself.

pub mod camera;
pub mod decoder;
pub mod frame;
pub mod traits;

// Re-exports
pub use camera::{
    CameraDetection, CameraInfo, CaptureConstraints, FacingMode, OpenCvCamera, OpenCvStream,
};
pub use decoder::OpenCvBarcodeDecoder;
pub use frame::RasterFrame;
pub use traits::{BarcodeDecoder, CameraSource, CaptureStream, DecodeOutcome, TrackInfo, TrackState};
