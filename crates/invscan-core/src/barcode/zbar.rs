//! ZBar-compatible symbol detector backed by `zedbar` (pure Rust).

use image::GrayImage;
use zedbar::{DecoderConfig, Image, Scanner};

use crate::error::BarcodeError;
use crate::models::config::BarcodeConfig;

use super::SymbolDetector;

/// Detector scanning for every symbology zedbar enables by default.
pub struct ZedbarDetector {
    test_inverted: bool,
}

impl ZedbarDetector {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self::from_config(&BarcodeConfig::default())
    }

    /// Create a detector from configuration.
    pub fn from_config(config: &BarcodeConfig) -> Self {
        Self {
            test_inverted: config.test_inverted,
        }
    }
}

impl Default for ZedbarDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolDetector for ZedbarDetector {
    fn detect(&self, luma: &GrayImage) -> Result<Vec<String>, BarcodeError> {
        let (width, height) = luma.dimensions();

        let mut image = Image::from_gray(luma.as_raw(), width, height)
            .map_err(|e| BarcodeError::InvalidImage(format!("zedbar: {:?}", e)))?;

        let config = DecoderConfig::new().test_inverted(self.test_inverted);
        let mut scanner = Scanner::with_config(config);

        let symbols = scanner
            .scan(&mut image)
            .iter()
            .filter_map(|symbol| symbol.data_string().map(str::to_string))
            .collect();

        Ok(symbols)
    }
}
