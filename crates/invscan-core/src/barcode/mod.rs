//! Barcode decoding over a luminance copy of the captured image.

mod zbar;

pub use zbar::ZedbarDetector;

use image::GrayImage;
use tracing::{debug, warn};

use crate::error::BarcodeError;
use crate::models::image::CapturedImage;

/// A 1D/2D symbol detector.
pub trait SymbolDetector {
    /// Decoded payloads of every symbol found, in detector order.
    fn detect(&self, luma: &GrayImage) -> Result<Vec<String>, BarcodeError>;
}

/// Reads at most one barcode from an image.
pub struct BarcodeDecoder<D: SymbolDetector> {
    detector: D,
}

impl<D: SymbolDetector> BarcodeDecoder<D> {
    /// Create a decoder around a detector.
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Decode the first symbol in the image.
    ///
    /// Detector order is not stable across inputs, so with several symbols
    /// present any one of them may win. Detector failures are logged and
    /// reported as no barcode.
    pub fn decode(&self, image: &CapturedImage) -> Option<String> {
        let luma = image.luminance();

        match self.detector.detect(&luma) {
            Ok(symbols) => {
                debug!("Detected {} barcode symbols", symbols.len());
                symbols.into_iter().next()
            }
            Err(e) => {
                warn!("Barcode detection failed: {}", e);
                None
            }
        }
    }
}
