//! OCR over label photos.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that can turn an image into a multi-line text blob.
pub trait TextReader {
    /// Recognize text, one detected line per `\n`-separated line.
    fn read_text(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from unordered boxes, sorting them into reading order.
    pub fn from_boxes(mut boxes: Vec<TextBox>, image_size: (u32, u32), processing_time_ms: u64) -> Self {
        sort_by_reading_order(&mut boxes);

        // Boxes sharing a row form one printed line.
        let text = {
            let mut lines: Vec<Vec<&str>> = Vec::new();
            let mut current_row = None;
            for b in &boxes {
                let row = row_of(b);
                if current_row != Some(row) {
                    lines.push(Vec::new());
                    current_row = Some(row);
                }
                if let Some(words) = lines.last_mut() {
                    words.push(b.text.trim());
                }
            }

            lines
                .iter()
                .map(|words| words.join(" "))
                .collect::<Vec<_>>()
                .join("\n")
        };

        Self {
            boxes,
            text,
            processing_time_ms,
            image_size,
        }
    }
}

/// Height of a reading-order row in pixels.
const ROW_HEIGHT: f32 = 20.0;

fn row_of(b: &TextBox) -> i32 {
    (b.rect().1 / ROW_HEIGHT) as i32
}

/// Sort boxes top-to-bottom in rows, then left-to-right within a row.
fn sort_by_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        row_of(a).cmp(&row_of(b)).then_with(|| {
            a.rect()
                .0
                .partial_cmp(&b.rect().0)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
}
