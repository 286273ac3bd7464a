//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for invscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Barcode detector configuration.
    pub barcode: BarcodeConfig,

    /// Product number extraction configuration.
    pub extraction: ExtractionConfig,

    /// Retailer lookup configuration.
    pub lookup: LookupConfig,

    /// Record sink configuration.
    pub sink: SinkConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,

    /// Maximum image dimension (longer side) handed to the recognizer.
    pub max_image_size: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            max_image_size: 2048,
        }
    }
}

impl OcrConfig {
    /// Full paths of (detection model, recognition model, dictionary).
    pub fn model_paths(&self) -> (PathBuf, PathBuf, PathBuf) {
        (
            self.model_dir.join(&self.detection_model),
            self.model_dir.join(&self.recognition_model),
            self.model_dir.join(&self.dictionary),
        )
    }
}

/// Barcode detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeConfig {
    /// Retry with an inverted image when nothing is found.
    pub test_inverted: bool,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self { test_inverted: true }
    }
}

/// Which product number policy to apply to OCR lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Any line with a hyphen and a digit.
    #[default]
    HyphenDigit,
    /// First regex match inside a line.
    Pattern,
}

/// Product number extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Line policy.
    pub policy: PolicyKind,

    /// Regex used by the `pattern` policy.
    pub pattern: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::HyphenDigit,
            pattern: crate::extract::DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Retailer lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Web search endpoint; the query goes in the `q` parameter.
    pub search_url: String,

    /// User-Agent header sent with every search.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Query the three retailers concurrently.
    pub concurrent: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
            concurrent: true,
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkBackend {
    /// Local CSV file.
    #[default]
    Csv,
    /// Google Sheets worksheet.
    Sheets,
}

/// Record sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Selected backend.
    pub backend: SinkBackend,

    /// Path of the CSV table.
    pub csv_path: PathBuf,

    /// Google Sheets settings.
    pub sheets: SheetsConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: SinkBackend::Csv,
            csv_path: PathBuf::from("inventory.csv"),
            sheets: SheetsConfig::default(),
        }
    }
}

/// Google Sheets settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Spreadsheet ID (the long token in the sheet URL).
    pub spreadsheet_id: String,

    /// Worksheet (tab) name used as the value range.
    pub worksheet: String,

    /// Service-account JSON key. Falls back to `GOOGLE_APPLICATION_CREDENTIALS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,

    /// Sheets API base URL.
    pub api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            worksheet: "Sheet1".to_string(),
            credentials_path: None,
            api_base: "https://sheets.googleapis.com".to_string(),
        }
    }
}

impl SheetsConfig {
    /// Configured key path, or the standard environment variable.
    pub fn resolve_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path
            .clone()
            .or_else(|| std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from))
    }
}

impl InvscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
