//! Record sinks: append-only tabular stores for inventory records.

mod csv_file;
mod sheets;

pub use csv_file::LocalTableSink;
pub use sheets::{ServiceAccountKey, SheetsSink};

use async_trait::async_trait;
use tracing::info;

use crate::error::SinkError;
use crate::models::config::{SinkBackend, SinkConfig};
use crate::models::record::InventoryRecord;

/// An append-only table of inventory records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Add one row at the end of the table.
    async fn append(&self, record: &InventoryRecord) -> Result<(), SinkError>;

    /// Every stored row, in append order.
    async fn list(&self) -> Result<Vec<InventoryRecord>, SinkError>;

    /// Human-readable location of the table.
    fn describe(&self) -> String;
}

/// Open the configured backend.
///
/// Sheets credentials are read here, once, and owned by the returned sink.
pub fn open_sink(config: &SinkConfig) -> Result<Box<dyn RecordSink>, SinkError> {
    let sink: Box<dyn RecordSink> = match config.backend {
        SinkBackend::Csv => Box::new(LocalTableSink::open(&config.csv_path)?),
        SinkBackend::Sheets => {
            let key_path = config.sheets.resolve_credentials_path().ok_or_else(|| {
                SinkError::Credentials(
                    "no service-account key: set sink.sheets.credentials_path or GOOGLE_APPLICATION_CREDENTIALS"
                        .to_string(),
                )
            })?;
            let key = ServiceAccountKey::from_file(&key_path)?;
            Box::new(SheetsSink::new(&config.sheets, key)?)
        }
    };

    info!("Record sink: {}", sink.describe());
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_csv_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = SinkConfig {
            csv_path: dir.path().join("inventory.csv"),
            ..SinkConfig::default()
        };

        let sink = open_sink(&config).unwrap();
        assert!(sink.describe().contains("inventory.csv"));
        assert!(config.csv_path.exists());
    }

    #[test]
    fn test_open_sheets_with_missing_key_file() {
        let mut config = SinkConfig::default();
        config.backend = SinkBackend::Sheets;
        config.sheets.spreadsheet_id = "sheet-id".to_string();
        config.sheets.credentials_path = Some(PathBuf::from("/nonexistent/key.json"));

        assert!(matches!(open_sink(&config), Err(SinkError::Credentials(_))));
    }
}
