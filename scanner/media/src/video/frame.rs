//! Off-screen raster buffer.
//!
//! A [`RasterFrame`] is an 8-bit luma image. The scan loop keeps one per
//! session and resizes it in place to the stream's natural resolution before
//! every sample, so steady-state sampling does not allocate.

use std::time::Instant;

/// Grayscale frame handed to barcode decoders
#[derive(Debug, Clone, Default)]
pub struct RasterFrame {
    width: u32,
    height: u32,
    luma: Vec<u8>,
    captured_at: Option<Instant>,
}

impl RasterFrame {
    /// Creates an empty (0x0) frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a black frame of the given size
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut frame = Self::new();
        frame.resize(width, height);
        frame
    }

    /// Resizes the buffer, keeping its allocation where possible
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.luma.resize(width as usize * height as usize, 0);
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero (stream not ready yet)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row-major luma bytes
    pub fn pixels(&self) -> &[u8] {
        &self.luma
    }

    /// Mutable row-major luma bytes
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.luma
    }

    /// Records when the pixels were captured
    pub fn mark_captured(&mut self, at: Instant) {
        self.captured_at = Some(at);
    }

    /// Capture timestamp of the current contents, if any
    pub fn captured_at(&self) -> Option<Instant> {
        self.captured_at
    }
}
