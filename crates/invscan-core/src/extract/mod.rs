//! Product number extraction from OCR text.

mod policy;

pub use policy::{
    policy_from_config, HyphenDigitPolicy, PatternPolicy, ProductNumberPolicy, DEFAULT_PATTERN,
};

use image::DynamicImage;
use tracing::{debug, warn};

use crate::models::image::CapturedImage;
use crate::ocr::TextReader;

/// Runs OCR over an image and picks the first line the policy accepts.
pub struct ProductNumberExtractor<R: TextReader> {
    reader: R,
    policy: Box<dyn ProductNumberPolicy>,
}

impl<R: TextReader> ProductNumberExtractor<R> {
    /// Create an extractor with the default hyphen-and-digit policy.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            policy: Box::new(HyphenDigitPolicy),
        }
    }

    /// Replace the line policy.
    pub fn with_policy(mut self, policy: Box<dyn ProductNumberPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Extract a product number from an image. OCR failures are logged and
    /// reported as absent.
    pub fn extract(&self, image: &CapturedImage) -> Option<String> {
        let luma = DynamicImage::ImageLuma8(image.luminance());

        match self.reader.read_text(&luma) {
            Ok(text) => {
                debug!("OCR text: {:?}", text);
                self.extract_from_text(&text)
            }
            Err(e) => {
                warn!("OCR failed: {}", e);
                None
            }
        }
    }

    /// First accepted line of an OCR text blob, trimmed.
    pub fn extract_from_text(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .find_map(|line| self.policy.accept(line))
    }
}
