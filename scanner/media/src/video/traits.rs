//! Capture and decode traits
//!
//! These are the seams between the scan loop and the hardware. The scan
//! loop only ever talks to a [`CameraSource`], the [`CaptureStream`] it
//! hands out, and a [`BarcodeDecoder`]; tests substitute scripted fakes.

use super::camera::{CameraInfo, CaptureConstraints};
use super::frame::RasterFrame;
use crate::error::{CameraError, Result};

/// Lifecycle of one media track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Hardware is delivering frames
    Live,
    /// Track stopped; hardware released
    Ended,
}

/// Description of one track inside a capture stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// Human readable label (device name)
    pub label: String,
    /// Current state
    pub state: TrackState,
}

/// A live camera stream, exclusively owned by one scan session
///
/// # Responsibilities
/// - Report the stream's natural resolution (0x0 until known)
/// - Copy the current frame into a caller-owned raster buffer
/// - Stop every track on request, releasing the hardware
pub trait CaptureStream {
    /// Natural (width, height) of the video; zero while not ready
    fn natural_size(&self) -> (u32, u32);

    /// Re-checks the size while it is still unknown and returns it
    ///
    /// The scan loop calls this on every sample so a stream that opened
    /// before its first frame can become ready later.
    fn poll_size(&mut self) -> (u32, u32) {
        self.natural_size()
    }

    /// Copies the current frame into `frame`, resizing it as needed
    fn read_frame(&mut self, frame: &mut RasterFrame) -> Result<()>;

    /// Every track belonging to this stream
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stops every track. Calling it twice is harmless.
    fn stop_tracks(&mut self);

    /// True while at least one track is live
    fn is_live(&self) -> bool {
        self.tracks().iter().any(|t| t.state == TrackState::Live)
    }
}

/// Something that can hand out camera streams
pub trait CameraSource {
    /// Stream type produced by [`CameraSource::open`]
    type Stream: CaptureStream;

    /// Acquires a video-only stream honouring `constraints` as closely as
    /// the hardware allows
    ///
    /// # Errors
    /// The returned [`CameraError`] tells the caller whether access was
    /// refused, no device exists, or the device is busy.
    fn open(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> std::result::Result<Self::Stream, CameraError>;

    /// Lists capture devices without opening them
    fn list_devices(&mut self) -> std::result::Result<Vec<CameraInfo>, CameraError>;

    /// Opens and immediately releases the preferred device, surfacing
    /// permission or availability problems before scanning starts
    fn probe_access(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> std::result::Result<(), CameraError> {
        let mut stream = self.open(constraints)?;
        stream.stop_tracks();
        Ok(())
    }
}

/// Result of one decode attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A barcode was read
    Found(String),
    /// No barcode in this frame (the normal case)
    NotFound,
    /// The decoder itself failed
    Fault(String),
}

/// Barcode decoder working on luma rasters
pub trait BarcodeDecoder {
    /// Attempts to read one barcode from `frame`
    fn decode(&mut self, frame: &RasterFrame) -> DecodeOutcome;

    /// Decoder name for logs
    fn name(&self) -> &str;
}
