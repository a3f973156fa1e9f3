//! OpenCV barcode decoder.
//!
//! Runs OpenCV's 1D barcode detector first (EAN/UPC/Code128 labels are the
//! common case on sample bags), then the QR detector. Either one finding text
//! ends the attempt.

use crate::common::constants::logging::DECODER_LOG_INTERVAL;
use crate::error::Result;
use crate::video::frame::RasterFrame;
use crate::video::traits::{BarcodeDecoder, DecodeOutcome};
use logging::Logger;
use opencv::core::{CV_8UC1, Mat, Scalar};
use opencv::objdetect::{BarcodeDetector, QRCodeDetector};
use opencv::prelude::*;

/// Multi-format decoder backed by OpenCV `objdetect`
pub struct OpenCvBarcodeDecoder {
    barcode: BarcodeDetector,
    qr: QRCodeDetector,
    scratch: Mat,
    attempts: u64,
    logger: Logger,
}

impl OpenCvBarcodeDecoder {
    /// Creates the barcode and QR detectors
    ///
    /// # Errors
    /// Returns `MediaError::OpenCv` if OpenCV cannot construct a detector.
    pub fn new(logger: Logger) -> Result<Self> {
        Ok(Self {
            barcode: BarcodeDetector::default()?,
            qr: QRCodeDetector::default()?,
            scratch: Mat::default(),
            attempts: 0,
            logger,
        })
    }

    /// Copies the raster into the reusable scratch matrix
    fn load_scratch(&mut self, frame: &RasterFrame) -> opencv::Result<()> {
        let rows = frame.height() as i32;
        let cols = frame.width() as i32;
        if self.scratch.rows() != rows || self.scratch.cols() != cols {
            self.scratch = Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?;
        }
        self.scratch.data_bytes_mut()?.copy_from_slice(frame.pixels());
        Ok(())
    }

    fn run_detectors(&mut self) -> opencv::Result<Option<String>> {
        let text = decoded_text(self.barcode.detect_and_decode_def(&self.scratch)?);
        if !text.is_empty() {
            return Ok(Some(text));
        }

        let text = decoded_text(self.qr.detect_and_decode_def(&self.scratch)?);
        Ok((!text.is_empty()).then_some(text))
    }
}

impl BarcodeDecoder for OpenCvBarcodeDecoder {
    fn decode(&mut self, frame: &RasterFrame) -> DecodeOutcome {
        if frame.is_empty() {
            return DecodeOutcome::NotFound;
        }

        self.attempts += 1;
        if self.attempts.is_multiple_of(DECODER_LOG_INTERVAL) {
            self.logger
                .debug(&format!("Decode attempts: {}", self.attempts));
        }

        let result = self
            .load_scratch(frame)
            .and_then(|_| self.run_detectors());

        match result {
            Ok(Some(text)) => DecodeOutcome::Found(text),
            Ok(None) => DecodeOutcome::NotFound,
            Err(e) => DecodeOutcome::Fault(e.to_string()),
        }
    }

    fn name(&self) -> &str {
        "opencv-objdetect"
    }
}

/// Normalizes detector output, which OpenCV bindings expose either as
/// `String` or as raw bytes depending on the binding version
fn decoded_text(raw: impl IntoDecodedText) -> String {
    raw.into_decoded_text().trim().to_string()
}

trait IntoDecodedText {
    fn into_decoded_text(self) -> String;
}

impl IntoDecodedText for String {
    fn into_decoded_text(self) -> String {
        self
    }
}

impl IntoDecodedText for Vec<u8> {
    fn into_decoded_text(self) -> String {
        String::from_utf8_lossy(&self).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::LogLevel;

    fn decoder() -> OpenCvBarcodeDecoder {
        let (logger, _capture) = Logger::capture(LogLevel::Debug);
        OpenCvBarcodeDecoder::new(logger).unwrap()
    }

    #[test]
    fn test_empty_frame_is_not_found() {
        let mut decoder = decoder();
        assert_eq!(decoder.decode(&RasterFrame::new()), DecodeOutcome::NotFound);
    }

    #[test]
    fn test_blank_frame_is_not_found() {
        let mut decoder = decoder();
        let frame = RasterFrame::with_size(320, 240);
        assert_eq!(decoder.decode(&frame), DecodeOutcome::NotFound);
    }

    #[test]
    fn test_scratch_follows_frame_size() {
        let mut decoder = decoder();
        decoder.decode(&RasterFrame::with_size(64, 48));
        assert_eq!((decoder.scratch.cols(), decoder.scratch.rows()), (64, 48));

        decoder.decode(&RasterFrame::with_size(32, 16));
        assert_eq!((decoder.scratch.cols(), decoder.scratch.rows()), (32, 16));
    }

    #[test]
    fn test_decoded_text_trims_bytes() {
        assert_eq!(decoded_text(b" 4006381333931\n".to_vec()), "4006381333931");
        assert_eq!(decoded_text(String::new()), "");
    }
}
