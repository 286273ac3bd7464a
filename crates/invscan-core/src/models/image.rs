//! Captured image handed to the pipeline.

use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage};

use crate::error::Result;

/// A decoded color raster, owned by one pipeline run and never persisted.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    image: DynamicImage,
}

impl CapturedImage {
    /// Wrap an already decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode an image file (PNG, JPEG, ...).
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(image::open(path)?))
    }

    /// Decode an encoded image buffer, e.g. a camera upload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(image::load_from_memory(bytes)?))
    }

    /// The color image.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Fresh single-channel luminance copy.
    pub fn luminance(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Image dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl From<DynamicImage> for CapturedImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_from_bytes_roundtrips_png() {
        let rgb = RgbImage::from_pixel(4, 3, Rgb([200, 10, 10]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let captured = CapturedImage::from_bytes(&png).unwrap();
        assert_eq!(captured.dimensions(), (4, 3));
        assert_eq!(captured.luminance().dimensions(), (4, 3));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(CapturedImage::from_bytes(b"not an image").is_err());
    }
}
