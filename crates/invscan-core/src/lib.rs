//! Core library for inventory label scanning.
//!
//! This crate provides:
//! - Barcode decoding over a luminance copy of the captured image
//! - OCR and a replaceable heuristic for printed product numbers
//! - Retailer link lookup through a domain-scoped web search
//! - Record assembly and pluggable record sinks (CSV file, Google Sheets)

pub mod barcode;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod sink;

#[cfg(test)]
mod test_support;

pub use barcode::{BarcodeDecoder, SymbolDetector, ZedbarDetector};
pub use error::{BarcodeError, InvscanError, LookupError, OcrError, Result, SinkError};
pub use extract::{HyphenDigitPolicy, PatternPolicy, ProductNumberExtractor, ProductNumberPolicy};
pub use lookup::{LinkSource, PageFetcher, Retailer, RetailerLinks, RetailerLinkResolver, WebSearchSource};
pub use models::config::InvscanConfig;
pub use models::image::CapturedImage;
pub use models::record::InventoryRecord;
pub use ocr::{OcrResult, TextBox, TextReader};
pub use pipeline::{ScanOutcome, ScanPipeline};
pub use sink::{LocalTableSink, RecordSink, SheetsSink};

#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
