//! Local CSV table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::SinkError;
use crate::models::record::{InventoryRecord, HEADER};

use super::RecordSink;

/// A CSV file holding the whole table.
///
/// Every append reads the full file, adds one row and rewrites it.
pub struct LocalTableSink {
    path: PathBuf,
}

impl LocalTableSink {
    /// Open the table, creating it with only the header row if absent.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let sink = Self {
            path: path.to_path_buf(),
        };

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| sink.io_error(e))?;
            }
            sink.write_table(&[])?;
            debug!("Created {}", path.display());
        }

        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<Vec<InventoryRecord>, SinkError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_slice());

        let headers = reader.headers()?;
        if !headers.iter().eq(HEADER) {
            return Err(SinkError::Schema(format!(
                "{} has header {:?}, expected {:?}",
                self.path.display(),
                headers.iter().collect::<Vec<_>>(),
                HEADER
            )));
        }

        reader
            .records()
            .map(|row| -> Result<InventoryRecord, SinkError> {
                Ok(InventoryRecord::from_row(row?.iter()))
            })
            .collect()
    }

    fn write_table(&self, records: &[InventoryRecord]) -> Result<(), SinkError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for record in records {
            writer.write_record(record.as_row())?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| self.io_error(e.into_error()))?;
        fs::write(&self.path, data).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl RecordSink for LocalTableSink {
    async fn append(&self, record: &InventoryRecord) -> Result<(), SinkError> {
        let mut records = self.read_table()?;
        records.push(record.clone());
        self.write_table(&records)?;

        debug!("{} now holds {} rows", self.path.display(), records.len());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InventoryRecord>, SinkError> {
        self.read_table()
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}
