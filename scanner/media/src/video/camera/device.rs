//! OpenCV camera source.
//!
//! [`OpenCvCamera`] hands out [`OpenCvStream`]s backed by an OpenCV
//! `VideoCapture`. Frames are converted to grayscale on read, which is all a
//! barcode decoder needs.

use crate::common::constants::logging::CAMERA_LOG_INTERVAL;
use crate::error::{CameraError, MediaError, Result};
use crate::video::frame::RasterFrame;
use crate::video::traits::{CameraSource, CaptureStream, TrackInfo, TrackState};
use logging::Logger;
use opencv::core::Mat;
use opencv::imgproc::{COLOR_BGR2GRAY, cvt_color_def};
use opencv::prelude::*;
use opencv::videoio::{CAP_ANY, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH, VideoCapture};
use std::time::Instant;

use super::config::CaptureConstraints;
use super::detection::CameraDetection;
use super::info::CameraInfo;

/// Camera source backed by OpenCV `VideoCapture`
pub struct OpenCvCamera {
    logger: Logger,
}

impl OpenCvCamera {
    /// Creates a camera source; no device is touched until `open`
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Lists devices with their default resolution
    ///
    /// Each device is opened briefly; one that cannot be opened is still
    /// listed, with an unknown (0x0) resolution.
    pub fn describe_devices(&self) -> Vec<CameraInfo> {
        CameraDetection::list_devices(&self.logger)
            .into_iter()
            .map(|device| {
                CameraDetection::probe_device(device.device_id, &self.logger).unwrap_or(device)
            })
            .collect()
    }

    fn open_device(
        &self,
        device: &CameraInfo,
        constraints: &CaptureConstraints,
    ) -> std::result::Result<OpenCvStream, CameraError> {
        CameraDetection::check_access(device.device_id)?;

        let mut capture = VideoCapture::new(device.device_id, CAP_ANY).map_err(|e| {
            CameraError::Unavailable(format!("Failed to open {}: {}", device.name, e))
        })?;

        if !capture.is_opened().unwrap_or(false) {
            let _ = capture.release();
            return Err(CameraError::Unavailable(format!(
                "{} exists but could not be opened (in use?)",
                device.name
            )));
        }

        let _ = capture.set(CAP_PROP_FRAME_WIDTH, f64::from(constraints.ideal_width));
        let _ = capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(constraints.ideal_height));

        let mut stream = OpenCvStream {
            capture,
            label: device.name.clone(),
            width: 0,
            height: 0,
            state: TrackState::Live,
            frames_read: 0,
            bgr: Mat::default(),
            gray: Mat::default(),
            logger: self.logger.clone(),
        };
        let (width, height) = stream.query_size();
        stream.width = width;
        stream.height = height;

        if (width, height) != (constraints.ideal_width, constraints.ideal_height) {
            self.logger.warn(&format!(
                "Resolution mismatch (got: {}x{}, ideal: {}x{})",
                width, height, constraints.ideal_width, constraints.ideal_height
            ));
        }

        self.logger.info(&format!(
            "Opened {} (ID: {}) at {}x{}",
            device.name, device.device_id, width, height
        ));

        Ok(stream)
    }
}

impl CameraSource for OpenCvCamera {
    type Stream = OpenCvStream;

    fn open(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> std::result::Result<OpenCvStream, CameraError> {
        let devices = CameraDetection::list_devices(&self.logger);
        if devices.is_empty() {
            return Err(CameraError::NotFound(
                "No camera devices found. Please connect a camera and try again.".to_string(),
            ));
        }

        let device = CameraDetection::select_device(&devices, constraints).ok_or_else(|| {
            CameraError::NotFound(format!(
                "Camera {} is not present",
                constraints.device_id.unwrap_or(-1)
            ))
        })?;

        self.logger.info(&format!(
            "Selected {} (ID: {}, facing: {}, wanted: {})",
            device.name, device.device_id, device.facing, constraints.facing
        ));

        self.open_device(device, constraints)
    }

    fn list_devices(&mut self) -> std::result::Result<Vec<CameraInfo>, CameraError> {
        Ok(CameraDetection::list_devices(&self.logger))
    }
}

/// Live OpenCV capture stream (one video track)
pub struct OpenCvStream {
    capture: VideoCapture,
    label: String,
    width: u32,
    height: u32,
    state: TrackState,
    frames_read: u64,
    bgr: Mat,
    gray: Mat,
    logger: Logger,
}

impl OpenCvStream {
    fn grab_gray(&mut self) -> Result<()> {
        let success = self
            .capture
            .read(&mut self.bgr)
            .map_err(|e| CameraError::Other(format!("Failed to read frame: {}", e)))?;

        if !success || self.bgr.empty() {
            return Err(MediaError::Frame("Empty or invalid frame".to_string()));
        }

        cvt_color_def(&self.bgr, &mut self.gray, COLOR_BGR2GRAY)?;
        self.width = self.gray.cols().max(0) as u32;
        self.height = self.gray.rows().max(0) as u32;
        Ok(())
    }

    fn query_size(&self) -> (u32, u32) {
        let width = self.capture.get(CAP_PROP_FRAME_WIDTH).unwrap_or(0.0) as u32;
        let height = self.capture.get(CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0) as u32;
        (width, height)
    }
}

impl CaptureStream for OpenCvStream {
    fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Some backends report 0x0 until the first frame arrives; ask again,
    /// then fall back to grabbing a frame and measuring it
    fn poll_size(&mut self) -> (u32, u32) {
        if self.state == TrackState::Ended || (self.width > 0 && self.height > 0) {
            return self.natural_size();
        }

        (self.width, self.height) = self.query_size();
        if self.width == 0 || self.height == 0 {
            if let Err(e) = self.grab_gray() {
                self.logger
                    .debug(&format!("{} not ready yet: {}", self.label, e));
            }
        }
        self.natural_size()
    }

    fn read_frame(&mut self, frame: &mut RasterFrame) -> Result<()> {
        if self.state == TrackState::Ended {
            return Err(CameraError::Other("Stream already stopped".to_string()).into());
        }

        self.grab_gray()?;

        frame.resize(self.width, self.height);
        frame.pixels_mut().copy_from_slice(self.gray.data_bytes()?);
        frame.mark_captured(Instant::now());

        self.frames_read += 1;
        if self.frames_read.is_multiple_of(CAMERA_LOG_INTERVAL) {
            self.logger
                .debug(&format!("Frames read from {}: {}", self.label, self.frames_read));
        }

        Ok(())
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![TrackInfo {
            label: self.label.clone(),
            state: self.state,
        }]
    }

    fn stop_tracks(&mut self) {
        if self.state == TrackState::Ended {
            return;
        }

        self.logger.info(&format!(
            "Stopping track '{}' after {} frames",
            self.label, self.frames_read
        ));

        if let Err(e) = self.capture.release() {
            self.logger.error(&format!("Error releasing camera: {}", e));
        }
        self.state = TrackState::Ended;
    }
}

impl Drop for OpenCvStream {
    /// Releases the device if the owner never stopped the stream
    fn drop(&mut self) {
        self.stop_tracks();
    }
}
