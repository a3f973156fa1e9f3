//! Time source for the scan loop.
//!
//! Everything time-dependent in the controller (throttle, debounce window,
//! restart settling delay, frame pacing) reads time through [`Clock`], so a
//! [`ManualClock`] can drive it deterministically.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source that can also block the caller
pub trait Clock: Clone {
    /// Current instant
    fn now(&self) -> Instant;

    /// Blocks the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time backed by [`Instant::now`] and [`thread::sleep`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Clock that only moves when told to
///
/// `sleep` advances the clock instead of blocking. Clones share the same
/// time, so a test can hold one while the controller holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
    origin: Instant,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            now: Arc::new(Mutex::new(origin)),
            origin,
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += duration;
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.now() - self.origin
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_sleep_advances() {
        let clock = ManualClock::new();
        clock.sleep(Duration::from_millis(500));
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();

        other.advance(Duration::from_millis(100));
        assert_eq!(clock.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let t0 = clock.now();
        clock.sleep(Duration::from_millis(2));
        assert!(clock.now() > t0);
    }
}
