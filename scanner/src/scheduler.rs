//! Per-frame scheduling primitive.
//!
//! The scan loop never spins a thread of its own. It asks a
//! [`FrameScheduler`] for the next display frame and gets back a
//! [`FrameHandle`]; the host fires that handle into the controller at the
//! next refresh. A handle can be cancelled until it fires.

use crate::clock::Clock;
use std::time::{Duration, Instant};

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Host presentation cadence
pub trait FrameScheduler {
    /// Requests a callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a requested callback; unknown or fired handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Waits for the next frame boundary and returns the pending handle,
    /// or None when nothing is pending
    fn next_frame(&mut self) -> Option<FrameHandle>;
}

/// Paces frames at a fixed refresh interval using a [`Clock`]
///
/// At most one frame is pending at a time, like `requestAnimationFrame`
/// used by a single loop.
pub struct FrameTicker<K: Clock> {
    clock: K,
    frame_interval: Duration,
    next_id: u64,
    pending: Option<FrameHandle>,
    last_fired: Option<Instant>,
}

impl<K: Clock> FrameTicker<K> {
    /// Creates a ticker firing at most once per `frame_interval`
    pub fn new(clock: K, frame_interval: Duration) -> Self {
        Self {
            clock,
            frame_interval,
            next_id: 0,
            pending: None,
            last_fired: None,
        }
    }

    /// Currently pending handle, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl<K: Clock> FrameScheduler for FrameTicker<K> {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        let handle = self.pending?;

        if let Some(last) = self.last_fired {
            let deadline = last + self.frame_interval;
            let now = self.clock.now();
            if deadline > now {
                self.clock.sleep(deadline - now);
            }
        }

        self.last_fired = Some(self.clock.now());
        self.pending = None;
        Some(handle)
    }
}
