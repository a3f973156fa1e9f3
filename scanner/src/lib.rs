//! Barcode Scan Loop
//!
//! Drives a camera through a frame-throttled decode loop and reports each
//! physical barcode scan exactly once.
//!
//! # Overview
//! - [`ScanLoopController`] owns at most one camera session
//! - Frames are ticked at display cadence by a [`FrameScheduler`] and
//!   decoded at most once per sample interval
//! - A new detection stops the camera before the handler runs
//! - [`ScanLoopController::submit_manual`] feeds typed-in values through
//!   the same handler

pub mod clock;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod stats;
pub mod surface;
pub mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{DetectionHandler, ScanLoopController, StartOutcome, StopHandle, TickOutcome};
pub use debounce::DuplicateFilter;
pub use error::{Result, ScanError};
pub use scheduler::{FrameHandle, FrameScheduler, FrameTicker};
pub use session::ScanState;
pub use settings::ScanSettings;
pub use stats::ScanStats;
pub use surface::{HeadlessSurface, RenderSurface, StreamBinding};
pub use throttle::SampleThrottle;
