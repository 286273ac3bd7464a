//! Error types for the invscan-core library.

use thiserror::Error;

/// Main error type for the invscan library.
#[derive(Error, Debug)]
pub enum InvscanError {
    /// Barcode detection error.
    #[error("barcode error: {0}")]
    Barcode(#[from] BarcodeError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Retailer lookup error.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Record sink error.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a symbol detector.
///
/// These never reach the record: the decoder logs them and reports no barcode.
#[derive(Error, Debug)]
pub enum BarcodeError {
    /// The luminance buffer could not be handed to the detector.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The detector itself failed.
    #[error("symbol detection failed: {0}")]
    Detection(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors from a single retailer lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Transport failure, timeout or non-success status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-HTTP fetcher could not retrieve the page.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The result page could not be scanned for links.
    #[error("failed to parse result page: {0}")]
    Parse(String),

    /// Lookup settings are unusable.
    #[error("lookup configuration error: {0}")]
    Config(String),
}

/// Errors from a record sink. A failed append is the one hard failure of a scan.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Local file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The stored table does not carry the expected header.
    #[error("unexpected table header: {0}")]
    Schema(String),

    /// Sink settings are incomplete.
    #[error("sink configuration error: {0}")]
    Config(String),

    /// Service-account credentials are missing or unusable.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Remote store request failed.
    #[error("remote store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token signing failed.
    #[error("failed to sign token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Result type for the invscan library.
pub type Result<T> = std::result::Result<T, InvscanError>;
