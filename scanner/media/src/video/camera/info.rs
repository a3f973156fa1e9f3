//! Camera device information.

use super::config::FacingMode;

/// Information about an available camera device
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    /// Device identifier
    pub device_id: i32,
    /// Device name or path
    pub name: String,
    /// Maximum supported width in pixels (0 if not probed)
    pub max_width: u32,
    /// Maximum supported height in pixels (0 if not probed)
    pub max_height: u32,
    /// Orientation guessed from the device name
    pub facing: FacingMode,
}

impl CameraInfo {
    /// Name fragments that identify a rear-facing sensor
    const REAR_HINTS: [&'static str; 4] = ["back", "rear", "environment", "world"];
    /// Name fragments that identify a front-facing sensor
    const FRONT_HINTS: [&'static str; 4] = ["front", "user", "facetime", "integrated"];

    /// Creates camera info, guessing orientation from `name`
    pub fn new(device_id: i32, name: String, max_width: u32, max_height: u32) -> Self {
        let facing = Self::guess_facing(&name);
        Self {
            device_id,
            name,
            max_width,
            max_height,
            facing,
        }
    }

    /// Returns a string representation of the resolution
    pub fn resolution_string(&self) -> String {
        format!("{}x{}", self.max_width, self.max_height)
    }

    /// True if this device satisfies the orientation preference
    pub fn matches_facing(&self, wanted: FacingMode) -> bool {
        wanted == FacingMode::Any || self.facing == wanted
    }

    fn guess_facing(name: &str) -> FacingMode {
        let lower = name.to_lowercase();
        if Self::REAR_HINTS.iter().any(|hint| lower.contains(hint)) {
            FacingMode::Environment
        } else if Self::FRONT_HINTS.iter().any(|hint| lower.contains(hint)) {
            FacingMode::User
        } else {
            FacingMode::Any
        }
    }
}
