//! Camera device detection and enumeration.
//!
//! Platform-specific utilities for discovering capture devices, checking
//! access rights, and choosing the device that best fits a set of
//! [`CaptureConstraints`].

use crate::common::constants::capture::{MAX_DEVICE_NODES, MAX_DIMENSION};
use crate::error::CameraError;
use logging::Logger;
use opencv::prelude::*;
use opencv::videoio::{CAP_ANY, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH, VideoCapture};

use super::config::{CaptureConstraints, FacingMode};
use super::info::CameraInfo;

/// Camera device detection and enumeration
pub struct CameraDetection;

impl CameraDetection {
    /// Lists capture devices by name without opening them
    ///
    /// On Linux: even-numbered /dev/video* nodes with names from sysfs.
    /// On other platforms: device ids 0-3, unverified.
    pub fn list_devices(logger: &Logger) -> Vec<CameraInfo> {
        let devices: Vec<CameraInfo> = Self::enumerate_device_ids()
            .into_iter()
            .map(|id| CameraInfo::new(id, Self::get_device_name(id), 0, 0))
            .collect();

        if devices.is_empty() {
            logger.warn("No video devices detected");
        } else {
            for device in &devices {
                logger.debug(&format!(
                    "Device {}: {} (facing: {})",
                    device.device_id, device.name, device.facing
                ));
            }
        }

        devices
    }

    /// Opens a device briefly to read its default resolution
    ///
    /// Returns None if the device cannot be opened.
    pub fn probe_device(device_id: i32, logger: &Logger) -> Option<CameraInfo> {
        let mut capture = VideoCapture::new(device_id, CAP_ANY).ok()?;
        if !capture.is_opened().unwrap_or(false) {
            let _ = capture.release();
            return None;
        }

        let width = capture.get(CAP_PROP_FRAME_WIDTH).unwrap_or(0.0) as u32;
        let height = capture.get(CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0) as u32;
        let _ = capture.release();

        let (width, height) = if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
            (width, height)
        } else {
            logger.debug(&format!(
                "Device {} reported invalid resolution {}x{}",
                device_id, width, height
            ));
            (0, 0)
        };

        Some(CameraInfo::new(
            device_id,
            Self::get_device_name(device_id),
            width,
            height,
        ))
    }

    /// Picks the device that best satisfies `constraints`
    ///
    /// An explicit device id wins; otherwise the first device whose guessed
    /// orientation matches, then one of unknown orientation, then the first
    /// device at all, since facing is only a preference.
    pub fn select_device<'a>(
        devices: &'a [CameraInfo],
        constraints: &CaptureConstraints,
    ) -> Option<&'a CameraInfo> {
        if let Some(id) = constraints.device_id {
            return devices.iter().find(|d| d.device_id == id);
        }

        devices
            .iter()
            .find(|d| d.matches_facing(constraints.facing))
            .or_else(|| devices.iter().find(|d| d.facing == FacingMode::Any))
            .or_else(|| devices.first())
    }

    /// Checks that the current user may open the device node
    ///
    /// Only meaningful on Linux, where a missing or unreadable /dev/videoN is
    /// reported as `NotFound` or `PermissionDenied`.
    #[cfg(target_os = "linux")]
    pub fn check_access(device_id: i32) -> Result<(), CameraError> {
        use std::fs::OpenOptions;
        let path = format!("/dev/video{}", device_id);
        OpenOptions::new()
            .read(true)
            .open(&path)
            .map(|_| ())
            .map_err(|e| match CameraError::from(e) {
                CameraError::PermissionDenied(_) => {
                    CameraError::PermissionDenied(format!("{} is not readable", path))
                }
                CameraError::NotFound(_) => CameraError::NotFound(format!("{} does not exist", path)),
                other => other,
            })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn check_access(_device_id: i32) -> Result<(), CameraError> {
        Ok(())
    }

    /// Checks if a specific camera device is present
    pub fn is_device_available(device_id: i32) -> bool {
        #[cfg(target_os = "linux")]
        {
            std::path::Path::new(&format!("/dev/video{}", device_id)).exists()
        }

        #[cfg(not(target_os = "linux"))]
        {
            if let Ok(mut capture) = VideoCapture::new(device_id, CAP_ANY) {
                let is_open = capture.is_opened().unwrap_or(false);
                let _ = capture.release();
                return is_open;
            }
            false
        }
    }

    /// Enumerates potential device IDs on Linux
    ///
    /// Cameras often appear as both even (video0) and odd (video1) nodes,
    /// where the odd node carries metadata. Only even IDs are returned.
    #[cfg(target_os = "linux")]
    fn enumerate_device_ids() -> Vec<i32> {
        let mut device_ids: Vec<i32> = std::fs::read_dir("/dev")
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|entry| {
                        let name = entry.file_name().to_str()?.to_string();
                        name.strip_prefix("video")?.parse::<i32>().ok()
                    })
                    .filter(|id| id % 2 == 0 && *id < MAX_DEVICE_NODES)
                    .collect()
            })
            .unwrap_or_default();

        device_ids.sort_unstable();
        device_ids
    }

    #[cfg(not(target_os = "linux"))]
    fn enumerate_device_ids() -> Vec<i32> {
        (0..4)
            .filter(|&id| id < MAX_DEVICE_NODES && Self::is_device_available(id))
            .collect()
    }

    /// Gets a readable device name based on platform
    fn get_device_name(device_id: i32) -> String {
        #[cfg(target_os = "linux")]
        {
            let path = format!("/sys/class/video4linux/video{}/name", device_id);
            if let Ok(name) = std::fs::read_to_string(path) {
                return name.trim().to_string();
            }
            format!("Linux Camera {}", device_id)
        }

        #[cfg(not(target_os = "linux"))]
        {
            format!("Camera {}", device_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::LogLevel;

    fn devices() -> Vec<CameraInfo> {
        vec![
            CameraInfo::new(0, "Integrated Webcam".to_string(), 0, 0),
            CameraInfo::new(2, "USB Document Camera".to_string(), 0, 0),
            CameraInfo::new(4, "Rear Camera".to_string(), 0, 0),
        ]
    }

    #[test]
    fn test_select_prefers_explicit_device() {
        let devices = devices();
        let constraints = CaptureConstraints::default().with_device(2);
        let selected = CameraDetection::select_device(&devices, &constraints).unwrap();
        assert_eq!(selected.device_id, 2);
    }

    #[test]
    fn test_select_missing_explicit_device() {
        let devices = devices();
        let constraints = CaptureConstraints::default().with_device(8);
        assert!(CameraDetection::select_device(&devices, &constraints).is_none());
    }

    #[test]
    fn test_select_prefers_rear_camera() {
        let devices = devices();
        let selected =
            CameraDetection::select_device(&devices, &CaptureConstraints::default()).unwrap();
        assert_eq!(selected.device_id, 4);
    }

    #[test]
    fn test_select_falls_back_to_unknown_orientation() {
        let devices = vec![
            CameraInfo::new(0, "Integrated Webcam".to_string(), 0, 0),
            CameraInfo::new(2, "USB Document Camera".to_string(), 0, 0),
        ];
        let selected =
            CameraDetection::select_device(&devices, &CaptureConstraints::default()).unwrap();
        assert_eq!(selected.device_id, 2);
    }

    #[test]
    fn test_select_front_camera_on_request() {
        let devices = devices();
        let constraints = CaptureConstraints::default().with_facing(FacingMode::User);
        let selected = CameraDetection::select_device(&devices, &constraints).unwrap();
        assert_eq!(selected.device_id, 0);
    }

    #[test]
    fn test_select_empty_list() {
        assert!(CameraDetection::select_device(&[], &CaptureConstraints::default()).is_none());
    }

    #[test]
    fn test_missing_device_is_not_available() {
        assert!(!CameraDetection::is_device_available(999));
    }

    #[test]
    fn test_enumerate_is_sorted() {
        let ids = CameraDetection::enumerate_device_ids();
        assert!(ids.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_list_devices_does_not_panic() {
        let (logger, _capture) = Logger::capture(LogLevel::Debug);
        let _ = CameraDetection::list_devices(&logger);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_check_access_missing_node() {
        let err = CameraDetection::check_access(999).unwrap_err();
        assert!(matches!(err, CameraError::NotFound(_)));
    }
}
