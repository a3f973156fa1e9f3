//! Camera preview window.
//!
//! Shows sampled frames in an OpenCV `highgui` window. Pressing `q` or
//! `Esc` in the window stops the scan and asks the host loop to quit.

use logging::Logger;
use media::RasterFrame;
use opencv::core::{CV_8UC1, Mat, Scalar};
use opencv::highgui;
use opencv::prelude::*;
use scanner::{RenderSurface, StopHandle, StreamBinding};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const KEY_ESC: i32 = 27;
const KEY_Q: i32 = b'q' as i32;

pub struct PreviewWindow {
    name: String,
    open: bool,
    mat: Mat,
    stop: StopHandle,
    quit: Arc<AtomicBool>,
    logger: Logger,
}

impl PreviewWindow {
    pub fn new(name: &str, stop: StopHandle, quit: Arc<AtomicBool>, logger: Logger) -> Self {
        Self {
            name: name.to_string(),
            open: false,
            mat: Mat::default(),
            stop,
            quit,
            logger,
        }
    }

    fn show(&mut self, frame: &RasterFrame) -> opencv::Result<()> {
        let rows = frame.height() as i32;
        let cols = frame.width() as i32;
        if self.mat.rows() != rows || self.mat.cols() != cols {
            self.mat = Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?;
        }
        self.mat.data_bytes_mut()?.copy_from_slice(frame.pixels());
        highgui::imshow(&self.name, &self.mat)?;

        let key = highgui::wait_key(1)?;
        if key == KEY_ESC || key == KEY_Q {
            self.logger.info("Preview closed by user");
            self.quit.store(true, Ordering::SeqCst);
            self.stop.request_stop();
        }
        Ok(())
    }
}

impl RenderSurface for PreviewWindow {
    fn attach(&mut self, binding: &StreamBinding) {
        if let Err(e) = highgui::named_window(&self.name, highgui::WINDOW_AUTOSIZE) {
            self.logger.warn(&format!("Failed to open preview window: {}", e));
            return;
        }
        let title = format!("{} - {} ({}x{})", self.name, binding.label, binding.width, binding.height);
        let _ = highgui::set_window_title(&self.name, &title);
        self.open = true;
    }

    fn present(&mut self, frame: &RasterFrame) {
        if !self.open || frame.is_empty() {
            return;
        }
        if let Err(e) = self.show(frame) {
            self.logger.warn(&format!("Preview update failed: {}", e));
        }
    }

    fn detach(&mut self) {
        if self.open {
            let _ = highgui::destroy_window(&self.name);
            // Let the window system process the close
            let _ = highgui::wait_key(1);
            self.open = false;
        }
    }
}
