//! Decode-rate gate.
//!
//! Frames arrive at display cadence (commonly 60 Hz) but are only decoded
//! once per sample interval (100 ms, 10 Hz). [`SampleThrottle`] decides, per
//! tick, whether this one gets to sample.

use std::time::{Duration, Instant};

/// Admits at most one sample per interval
#[derive(Debug, Clone)]
pub struct SampleThrottle {
    interval: Duration,
    last_sample: Option<Instant>,
}

impl SampleThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sample: None,
        }
    }

    /// Returns true and records `now` as the last sample if at least one
    /// interval has passed since the previous sample (or none happened yet)
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let due = match self.last_sample {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last_sample = Some(now);
        }
        due
    }

    /// Timestamp of the last admitted sample
    pub fn last_sample(&self) -> Option<Instant> {
        self.last_sample
    }
}
