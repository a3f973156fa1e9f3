//! Duplicate-detection filter.
//!
//! Remembers the last detected text for one debounce window. The window is a
//! deadline checked when the filter is consulted, not a timer, so clearing the
//! filter (as every session start does) leaves nothing behind that could fire
//! later.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DuplicateFilter {
    window: Duration,
    last: Option<String>,
    expires_at: Option<Instant>,
}

impl DuplicateFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: None,
            expires_at: None,
        }
    }

    /// True if `text` equals the remembered value and the window is still open
    pub fn is_duplicate(&mut self, text: &str, now: Instant) -> bool {
        self.current(now) == Some(text)
    }

    /// Remembers `text` until `now + window`
    pub fn record(&mut self, text: &str, now: Instant) {
        self.last = Some(text.to_string());
        self.expires_at = Some(now + self.window);
    }

    /// The remembered value, if its window has not elapsed
    pub fn current(&mut self, now: Instant) -> Option<&str> {
        if self.expires_at.is_some_and(|deadline| now >= deadline) {
            self.clear();
        }
        self.last.as_deref()
    }

    pub fn clear(&mut self) {
        self.last = None;
        self.expires_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[test]
    fn test_empty_filter_has_no_duplicates() {
        let mut filter = DuplicateFilter::new(WINDOW);
        assert!(!filter.is_duplicate("EAN-123", Instant::now()));
    }

    #[test]
    fn test_same_text_within_window_is_duplicate() {
        let t0 = Instant::now();
        let mut filter = DuplicateFilter::new(WINDOW);
        filter.record("EAN-123", t0);

        assert!(filter.is_duplicate("EAN-123", t0 + Duration::from_millis(999)));
        assert!(!filter.is_duplicate("EAN-456", t0 + Duration::from_millis(10)));
    }

    #[test]
    fn test_window_expiry_clears_value() {
        let t0 = Instant::now();
        let mut filter = DuplicateFilter::new(WINDOW);
        filter.record("EAN-123", t0);

        assert!(!filter.is_duplicate("EAN-123", t0 + WINDOW));
        assert_eq!(filter.current(t0 + WINDOW), None);
    }

    #[test]
    fn test_record_restarts_window() {
        let t0 = Instant::now();
        let mut filter = DuplicateFilter::new(WINDOW);
        filter.record("EAN-123", t0);
        filter.record("EAN-456", t0 + Duration::from_millis(800));

        let later = t0 + Duration::from_millis(1500);
        assert_eq!(filter.current(later), Some("EAN-456"));
    }

    #[test]
    fn test_clear_forgets_immediately() {
        let t0 = Instant::now();
        let mut filter = DuplicateFilter::new(WINDOW);
        filter.record("EAN-123", t0);
        filter.clear();

        assert!(!filter.is_duplicate("EAN-123", t0));
    }
}
