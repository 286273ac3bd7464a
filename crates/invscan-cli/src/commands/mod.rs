//! Subcommands and the wiring they share.

pub mod batch;
pub mod config;
pub mod list;
pub mod scan;

use std::path::{Path, PathBuf};

use console::{style, Term};
use tracing::debug;

use invscan_core::extract::policy_from_config;
use invscan_core::lookup::HttpFetcher;
use invscan_core::models::config::InvscanConfig;
use invscan_core::{
    BarcodeDecoder, InventoryRecord, ProductNumberExtractor, PureOcrEngine, RecordSink,
    RetailerLinkResolver, ScanPipeline, WebSearchSource, ZedbarDetector,
};

/// The production pipeline.
pub type Scanner = ScanPipeline<ZedbarDetector, PureOcrEngine, WebSearchSource<HttpFetcher>>;

/// Extensions accepted as label images.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invscan")
        .join("config.json")
}

/// The file `--config` names, else the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration; the default location falls back to built-in values.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvscanConfig> {
    if let Some(path) = config_path {
        return InvscanConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Cannot read config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(InvscanConfig::from_file(&path)?)
    } else {
        Ok(InvscanConfig::default())
    }
}

/// Build the pipeline. Missing OCR models are a startup error.
pub fn build_scanner(config: &InvscanConfig) -> anyhow::Result<Scanner> {
    let engine = PureOcrEngine::from_config(&config.ocr).map_err(|e| {
        anyhow::anyhow!(
            "{}\nPlace {}, {} and {} in {} or set ocr.model_dir.",
            e,
            config.ocr.detection_model,
            config.ocr.recognition_model,
            config.ocr.dictionary,
            config.ocr.model_dir.display()
        )
    })?;

    let extractor =
        ProductNumberExtractor::new(engine).with_policy(policy_from_config(&config.extraction)?);
    let decoder = BarcodeDecoder::new(ZedbarDetector::from_config(&config.barcode));
    let resolver = RetailerLinkResolver::new(WebSearchSource::from_config(&config.lookup)?)
        .with_concurrency(config.lookup.concurrent);

    Ok(ScanPipeline::new(decoder, extractor, resolver))
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is no.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{} [y/N] ", prompt))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Append a record, offering a retry on failure when `interactive`.
///
/// Returns whether the record was stored. A record that was not stored is
/// printed as JSON on stderr.
pub async fn save_record(
    sink: &dyn RecordSink,
    record: &InventoryRecord,
    interactive: bool,
) -> anyhow::Result<bool> {
    loop {
        match sink.append(record).await {
            Ok(()) => {
                println!("{} Saved to {}", style("✓").green(), sink.describe());
                return Ok(true);
            }
            Err(e) => {
                eprintln!("{} Failed to save: {}", style("✗").red(), e);
                if interactive && confirm("Retry?")? {
                    continue;
                }
                eprintln!("{}", style("Unsaved record:").yellow());
                eprintln!("{}", serde_json::to_string_pretty(record)?);
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("label.PNG")));
        assert!(is_image(Path::new("dir/label.webp")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_config_file_prefers_flag() {
        assert_eq!(config_file(Some("my.json")), PathBuf::from("my.json"));
        assert!(config_file(None).ends_with("invscan/config.json"));
    }
}
