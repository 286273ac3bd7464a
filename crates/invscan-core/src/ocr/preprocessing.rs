//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Prepares captured photos for the recognizer.
pub struct ImagePreprocessor {
    /// Maximum image dimension.
    max_size: u32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self { max_size: 2048 }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Single-channel luminance copy, downscaled to fit within the max size.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = self.calculate_resize_dimensions(width, height);

        let luma = DynamicImage::ImageLuma8(image.to_luma8());

        if (new_width, new_height) == (width, height) {
            return luma;
        }

        debug!(
            "Downscaling {}x{} to {}x{} for OCR",
            width, height, new_width, new_height
        );

        luma.resize_exact(
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        )
    }

    fn calculate_resize_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let max_dim = width.max(height);

        if max_dim <= self.max_size {
            return (width, height);
        }

        let scale = self.max_size as f32 / max_dim as f32;
        let new_width = (width as f32 * scale) as u32;
        let new_height = (height as f32 * scale) as u32;

        (new_width.max(1), new_height.max(1))
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_resize_dimensions() {
        let preprocessor = ImagePreprocessor::new().with_max_size(960);

        let (w, h) = preprocessor.calculate_resize_dimensions(500, 300);
        assert_eq!((w, h), (500, 300));

        let (w, h) = preprocessor.calculate_resize_dimensions(1920, 1080);
        assert_eq!(w, 960);
        assert!(h < 960);
    }

    #[test]
    fn test_prepare_is_single_channel() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([10, 200, 30])));
        let prepared = ImagePreprocessor::new().with_max_size(20).prepare(&image);

        assert!(matches!(prepared, DynamicImage::ImageLuma8(_)));
        assert_eq!(prepared.dimensions(), (20, 10));
    }
}
