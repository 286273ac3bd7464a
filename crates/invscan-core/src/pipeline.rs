//! Image-to-record pipeline.
//!
//! Barcode decode and product-number extraction both run over the same
//! captured image; the product number, if any, drives the retailer lookup;
//! the three results are merged into one [`InventoryRecord`].

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::barcode::{BarcodeDecoder, SymbolDetector};
use crate::extract::ProductNumberExtractor;
use crate::lookup::{LinkSource, RetailerLinkResolver, RetailerLinks};
use crate::models::image::CapturedImage;
use crate::models::record::InventoryRecord;
use crate::ocr::TextReader;

/// Everything one pipeline run derived from an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// First decoded symbol.
    pub barcode: Option<String>,
    /// First OCR line the policy accepted.
    pub product_number: Option<String>,
    /// `None` when there was no product number to look up.
    pub links: Option<RetailerLinks>,
    /// The assembled row, ready to append to a sink.
    pub record: InventoryRecord,
    pub processing_time_ms: u64,
}

/// Runs the decoder, extractor and resolver over one image.
pub struct ScanPipeline<D: SymbolDetector, R: TextReader, S: LinkSource> {
    decoder: BarcodeDecoder<D>,
    extractor: ProductNumberExtractor<R>,
    resolver: RetailerLinkResolver<S>,
}

impl<D: SymbolDetector, R: TextReader, S: LinkSource> ScanPipeline<D, R, S> {
    pub fn new(
        decoder: BarcodeDecoder<D>,
        extractor: ProductNumberExtractor<R>,
        resolver: RetailerLinkResolver<S>,
    ) -> Self {
        Self {
            decoder,
            extractor,
            resolver,
        }
    }

    /// Process one image. Never fails: every stage degrades to absent.
    pub async fn run(&self, image: &CapturedImage) -> ScanOutcome {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        info!("Scanning {}x{} image", width, height);

        let barcode = self.decoder.decode(image);
        match &barcode {
            Some(code) => info!("Barcode: {}", code),
            None => info!("No barcode found"),
        }

        let product_number = self.extractor.extract(image);

        let links = match &product_number {
            Some(pn) => {
                info!("Product number: {}", pn);
                Some(self.resolver.resolve(pn).await)
            }
            None => {
                info!("No product number found, skipping retailer lookup");
                None
            }
        };

        let record =
            InventoryRecord::assemble(barcode.as_deref(), product_number.as_deref(), links.as_ref());

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!("Scan finished in {}ms", processing_time_ms);

        ScanOutcome {
            barcode,
            product_number,
            links,
            record,
            processing_time_ms,
        }
    }
}
