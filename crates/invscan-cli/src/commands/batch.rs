//! Batch command - scan every label image matching a glob.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use invscan_core::sink::open_sink;
use invscan_core::{CapturedImage, InventoryRecord};

use super::list::format_table;
use super::scan::link_summary;
use super::{build_scanner, is_image, load_config, save_record};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of label images
    #[arg(required = true)]
    input: String,

    /// Save every record without asking
    #[arg(short, long)]
    yes: bool,
}

/// Outcome for one file.
struct BatchResult {
    path: PathBuf,
    record: Option<InventoryRecord>,
    error: Option<String>,
    saved: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching images found for pattern: {}", args.input);
    }

    println!("{} Found {} images to scan", style("ℹ").blue(), files.len());

    let sink = if args.yes {
        Some(open_sink(&config.sink)?)
    } else {
        None
    };
    let scanner = build_scanner(&config)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let image = match CapturedImage::open(&path) {
            Ok(image) => image,
            Err(e) => {
                warn!("Cannot open {}: {}", path.display(), e);
                results.push(BatchResult {
                    path,
                    record: None,
                    error: Some(e.to_string()),
                    saved: false,
                });
                pb.inc(1);
                continue;
            }
        };

        let outcome = scanner.run(&image).await;
        debug!("{}: {}", path.display(), link_summary(&outcome));

        let saved = match &sink {
            Some(sink) => save_record(sink.as_ref(), &outcome.record, false).await?,
            None => false,
        };

        results.push(BatchResult {
            path,
            record: Some(outcome.record),
            error: None,
            saved,
        });
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let scanned: Vec<&InventoryRecord> = results.iter().filter_map(|r| r.record.as_ref()).collect();
    let failed: Vec<&BatchResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let unsaved = results
        .iter()
        .filter(|r| r.record.is_some() && !r.saved)
        .count();

    if sink.is_none() && !scanned.is_empty() {
        println!();
        println!("{}", style("Records (not saved, rerun with --yes to save):").bold());
        let records: Vec<InventoryRecord> = scanned.iter().map(|r| (*r).clone()).collect();
        print!("{}", format_table(&records));
    }

    println!();
    println!(
        "{} Scanned {} images in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} scanned, {} failed",
        style(scanned.len()).green(),
        style(failed.len()).red()
    );
    if let Some(sink) = &sink {
        println!(
            "   {} saved to {}, {} unsaved",
            style(scanned.len() - unsaved).green(),
            sink.describe(),
            style(unsaved).yellow()
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed images:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
