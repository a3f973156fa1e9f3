//! Common constants shared across media modules

/// Logging intervals for frame processing
pub mod logging {
    /// Log progress every N frames read from a capture stream
    pub const CAMERA_LOG_INTERVAL: u64 = 100;
    /// Log progress every N decode attempts
    pub const DECODER_LOG_INTERVAL: u64 = 100;
}

/// Capture defaults
pub mod capture {
    /// Ideal capture width requested from the camera
    pub const IDEAL_WIDTH: u32 = 1280;
    /// Ideal capture height requested from the camera
    pub const IDEAL_HEIGHT: u32 = 720;
    /// Largest accepted dimension (8K)
    pub const MAX_DIMENSION: u32 = 7680;
    /// Linux exposes at most this many /dev/video nodes worth probing
    pub const MAX_DEVICE_NODES: i32 = 20;
}
