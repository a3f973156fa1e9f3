//! Scan loop timing and capture settings.

use crate::error::{Result, ScanError};
use media::CaptureConstraints;
use std::time::Duration;

/// Decode at most every 100 ms (10 Hz)
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);
/// Identical results within 1 s count as one scan
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);
/// Settling delay between stop and start on restart
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(500);
/// 60 Hz display cadence
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub sample_interval: Duration,
    pub debounce_window: Duration,
    pub restart_delay: Duration,
    /// Interval of the default frame ticker
    pub frame_interval: Duration,
    pub constraints: CaptureConstraints,
}

impl ScanSettings {
    /// Rejects zero durations
    pub fn validate(&self) -> Result<()> {
        let timings = [
            ("sample interval", self.sample_interval),
            ("debounce window", self.debounce_window),
            ("restart delay", self.restart_delay),
            ("frame interval", self.frame_interval),
        ];

        for (name, value) in timings {
            if value.is_zero() {
                return Err(ScanError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    /// Frame interval for a display refresh rate in Hz
    pub fn frame_interval_for(refresh_hz: u32) -> Result<Duration> {
        if refresh_hz == 0 {
            return Err(ScanError::Config(
                "refresh rate must be greater than 0".to_string(),
            ));
        }
        Ok(Duration::from_secs(1) / refresh_hz)
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            restart_delay: DEFAULT_RESTART_DELAY,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            constraints: CaptureConstraints::default(),
        }
    }
}
