//! Rendering surface the live stream is shown on.

use media::RasterFrame;

/// What a surface is told when a stream is bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamBinding {
    /// Label of the stream's video track
    pub label: String,
    /// Natural width at bind time (0 if not known yet)
    pub width: u32,
    /// Natural height at bind time (0 if not known yet)
    pub height: u32,
}

/// A place the camera preview goes
///
/// Surfaces are cheap handles: a session owns its surface for as long as
/// it runs and detaches it on stop.
pub trait RenderSurface {
    /// False if the surface cannot currently receive a stream
    fn is_available(&self) -> bool {
        true
    }

    /// Binds a freshly opened stream
    fn attach(&mut self, binding: &StreamBinding);

    /// Shows a sampled frame
    fn present(&mut self, _frame: &RasterFrame) {}

    /// Unbinds the stream; the surface must not hold frames afterwards
    fn detach(&mut self);
}

/// Surface that displays nothing but tracks its binding
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    binding: Option<StreamBinding>,
    frames_presented: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> Option<&StreamBinding> {
        self.binding.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderSurface for HeadlessSurface {
    fn attach(&mut self, binding: &StreamBinding) {
        self.binding = Some(binding.clone());
    }

    fn present(&mut self, _frame: &RasterFrame) {
        self.frames_presented += 1;
    }

    fn detach(&mut self) {
        self.binding = None;
    }
}
