//! List command - print the stored inventory table.

use clap::Args;
use console::style;

use invscan_core::models::record::HEADER;
use invscan_core::sink::open_sink;
use invscan_core::InventoryRecord;

use super::load_config;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: ListFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ListFormat {
    /// Aligned columns
    Table,
    /// CSV with header row
    Csv,
    /// JSON array
    Json,
}

pub async fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let sink = open_sink(&config.sink)?;
    let records = sink.list().await?;

    match args.format {
        ListFormat::Table => {
            if records.is_empty() {
                println!("{} {} is empty", style("ℹ").blue(), sink.describe());
            } else {
                print!("{}", format_table(&records));
                println!();
                println!("{} rows in {}", records.len(), sink.describe());
            }
        }
        ListFormat::Csv => print!("{}", format_csv(&records)?),
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }

    Ok(())
}

/// Records as left-aligned columns under the header.
pub fn format_table(records: &[InventoryRecord]) -> String {
    let mut widths = HEADER.map(|h| h.chars().count());
    for record in records {
        for (width, cell) in widths.iter_mut().zip(record.as_row()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 5]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(HEADER);
    for record in records {
        out.push_str(&line(record.as_row()));
    }
    out
}

fn format_csv(records: &[InventoryRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.write_record(record.as_row())?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}
