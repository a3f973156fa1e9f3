/// Counters kept by the scan loop across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Sessions started
    pub starts: u64,
    /// Sessions stopped
    pub stops: u64,
    /// Ticks that ran the loop body (stale ticks excluded)
    pub ticks: u64,
    /// Ticks skipped by the sample throttle
    pub throttled: u64,
    /// Ticks skipped because the stream had no size yet
    pub not_ready: u64,
    /// Frames grabbed and handed to the decoder
    pub samples: u64,
    /// Frame grabs that failed
    pub grab_failures: u64,
    /// Samples without a barcode
    pub misses: u64,
    /// Samples where the decoder faulted
    pub faults: u64,
    /// Decodes suppressed by the duplicate filter
    pub duplicates: u64,
    /// Detections delivered from the camera
    pub detections: u64,
    /// Values delivered through manual entry
    pub manual_entries: u64,
}
