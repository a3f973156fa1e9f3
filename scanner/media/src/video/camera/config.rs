//! Capture constraint types.
//!
//! Mirrors what a scanner asks of a camera: which way it should face and
//! the resolution it would ideally deliver. Capture is always video only.

use crate::common::constants::capture::{IDEAL_HEIGHT, IDEAL_WIDTH, MAX_DIMENSION};
use crate::error::{MediaError, Result};
use std::fmt;
use std::str::FromStr;

/// Preferred camera orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera, pointing away from the user
    Environment,
    /// Front camera, pointing at the user
    User,
    /// No preference
    Any,
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
            FacingMode::Any => "any",
        };
        f.write_str(name)
    }
}

impl FromStr for FacingMode {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "environment" | "rear" | "back" => Ok(FacingMode::Environment),
            "user" | "front" => Ok(FacingMode::User),
            "any" => Ok(FacingMode::Any),
            other => Err(MediaError::Config(format!(
                "Unknown facing mode '{}' (expected environment, user or any)",
                other
            ))),
        }
    }
}

/// Camera capture constraints
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConstraints {
    /// Preferred orientation; advisory, like a browser's `facingMode`
    pub facing: FacingMode,
    /// Ideal frame width in pixels
    pub ideal_width: u32,
    /// Ideal frame height in pixels
    pub ideal_height: u32,
    /// Explicit device; overrides `facing` when set
    pub device_id: Option<i32>,
}

impl CaptureConstraints {
    /// Sets the ideal resolution with validation
    ///
    /// # Returns
    /// * `Err(MediaError::Config)` - If either dimension is 0 or above 7680
    pub fn with_ideal_resolution(mut self, width: u32, height: u32) -> Result<Self> {
        for (name, value) in [("Width", width), ("Height", height)] {
            if !(1..=MAX_DIMENSION).contains(&value) {
                return Err(MediaError::Config(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_DIMENSION, value
                )));
            }
        }

        self.ideal_width = width;
        self.ideal_height = height;
        Ok(self)
    }

    /// Pins capture to one device id
    pub fn with_device(mut self, device_id: i32) -> Self {
        self.device_id = Some(device_id);
        self
    }

    /// Sets the preferred orientation
    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }
}

/// Rear camera at an ideal 1280x720, any device
impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
            device_id: None,
        }
    }
}
