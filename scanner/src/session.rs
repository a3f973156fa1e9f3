//! One camera-to-decoder binding.

use crate::scheduler::FrameHandle;
use crate::surface::{RenderSurface, StreamBinding};
use crate::throttle::SampleThrottle;
use media::{CaptureStream, RasterFrame};
use std::fmt;
use std::time::Duration;

/// Scan loop state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No session
    Idle,
    /// Camera open, ticks being processed
    Running,
    /// A stop was requested through a `StopHandle` and runs on the next
    /// tick; also held internally while a session is torn down
    Stopping,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Idle => "Idle",
            ScanState::Running => "Running",
            ScanState::Stopping => "Stopping",
        };
        f.write_str(name)
    }
}

/// Live session state
///
/// Owns the capture stream exclusively; dropping or closing the session
/// leaves no live track behind.
pub(crate) struct ScanSession<S: CaptureStream> {
    pub(crate) id: u32,
    pub(crate) stream: S,
    pub(crate) surface: Box<dyn RenderSurface>,
    pub(crate) throttle: SampleThrottle,
    pub(crate) frame: RasterFrame,
    pub(crate) pending: Option<FrameHandle>,
}

impl<S: CaptureStream> ScanSession<S> {
    /// Binds `stream` to `surface`
    pub(crate) fn open(
        stream: S,
        mut surface: Box<dyn RenderSurface>,
        sample_interval: Duration,
    ) -> Self {
        let (width, height) = stream.natural_size();
        let label = stream
            .tracks()
            .first()
            .map(|track| track.label.clone())
            .unwrap_or_default();
        surface.attach(&StreamBinding {
            label,
            width,
            height,
        });

        Self {
            id: rand::random::<u32>(),
            stream,
            surface,
            throttle: SampleThrottle::new(sample_interval),
            frame: RasterFrame::new(),
            pending: None,
        }
    }

    /// Stops every track and detaches the surface
    pub(crate) fn close(mut self) {
        self.stream.stop_tracks();
        self.surface.detach();
    }
}
