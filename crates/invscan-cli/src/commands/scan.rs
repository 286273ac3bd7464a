//! Scan command - turn one label image into an inventory record.

use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use invscan_core::sink::open_sink;
use invscan_core::{CapturedImage, Retailer, ScanOutcome};

use super::{build_scanner, confirm, load_config, save_record};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Label image (PNG, JPEG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Save without asking
    #[arg(short, long, conflicts_with = "no_save")]
    yes: bool,

    /// Only show the record, never save it
    #[arg(long)]
    no_save: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON document of everything derived
    Json,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Image not found: {}", args.input.display());
    }

    let image = CapturedImage::open(&args.input)?;

    // Sink credentials are loaded before any scanning happens.
    let sink = if args.no_save {
        None
    } else {
        Some(open_sink(&config.sink)?)
    };
    let scanner = build_scanner(&config)?;

    info!("Scanning {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Reading label and searching retailers...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = scanner.run(&image).await;

    pb.finish_and_clear();

    match args.format {
        OutputFormat::Text => print!("{}", format_outcome(&outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    let Some(sink) = sink else {
        return Ok(());
    };

    if !args.yes && !confirm(&format!("Save to {}?", sink.describe()))? {
        println!("{} Not saved", style("ℹ").blue());
        return Ok(());
    }

    if !save_record(sink.as_ref(), &outcome.record, true).await? {
        anyhow::bail!("Record was not saved");
    }

    Ok(())
}

/// Human-readable summary with informational messages for missing fields.
pub fn format_outcome(outcome: &ScanOutcome) -> String {
    let mut out = String::new();

    match &outcome.barcode {
        Some(code) => out.push_str(&format!("{:<16}{}\n", "Barcode:", code)),
        None => out.push_str(&format!("{} No barcode found\n", style("ℹ").blue())),
    }

    match &outcome.product_number {
        Some(pn) => out.push_str(&format!("{:<16}{}\n", "Product number:", pn)),
        None => out.push_str(&format!(
            "{} No product number found, retailers not searched\n",
            style("ℹ").blue()
        )),
    }

    if let Some(links) = &outcome.links {
        for (retailer, link) in links.iter() {
            let label = format!("{}:", retailer);
            match link {
                Some(url) => out.push_str(&format!("{:<16}{}\n", label, url)),
                None => out.push_str(&format!(
                    "{} No {} link found\n",
                    style("ℹ").blue(),
                    retailer
                )),
            }
        }
    }

    out
}

/// Retailer columns of a record, for one-line summaries.
pub fn link_summary(outcome: &ScanOutcome) -> String {
    Retailer::ALL
        .iter()
        .map(|r| format!("{}={}", r, outcome.record.link(*r)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use invscan_core::{InventoryRecord, RetailerLinks};

    fn outcome(product_number: Option<&str>, links: Option<RetailerLinks>) -> ScanOutcome {
        ScanOutcome {
            barcode: None,
            product_number: product_number.map(str::to_string),
            record: InventoryRecord::assemble(None, product_number, links.as_ref()),
            links,
            processing_time_ms: 0,
        }
    }

    #[test]
    fn test_format_reports_missing_fields() {
        console::set_colors_enabled(false);
        let text = format_outcome(&outcome(None, None));

        assert!(text.contains("No barcode found"));
        assert!(text.contains("retailers not searched"));
    }

    #[test]
    fn test_format_lists_links() {
        console::set_colors_enabled(false);
        let links = RetailerLinks::default()
            .with(Retailer::Lowes, Some("https://www.lowes.com/pd/1".to_string()));
        let text = format_outcome(&outcome(Some("K-1"), Some(links)));

        assert!(text.contains("Product number: K-1"));
        assert!(text.contains("No Ferguson link found"));
        assert!(text.contains("No Home Depot link found"));
        assert!(text.contains("Lowe's:         https://www.lowes.com/pd/1"));
    }

    #[test]
    fn test_link_summary() {
        let text = link_summary(&outcome(None, None));
        assert_eq!(
            text,
            "Ferguson=Not Searched Home Depot=Not Searched Lowe's=Not Searched"
        );
    }
}
