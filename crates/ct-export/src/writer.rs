//! Roster and report writers.
//!
//! Every writer creates missing parent directories and replaces an existing
//! file at the target path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ct_common::{RosterFormat, TieredMember};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::schema::{roster_batch, roster_schema};
use crate::DEFAULT_BATCH_SIZE;

/// Errors from export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl From<ExportError> for ct_common::Error {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io(e) => ct_common::Error::Io(e),
            other => ct_common::Error::Export(other.to_string()),
        }
    }
}

/// Writer configuration.
#[derive(Debug, Clone, Copy)]
pub struct WriterConfig {
    pub format: RosterFormat,
    /// Rows per Parquet record batch / row group flush.
    pub batch_size: usize,
}

impl WriterConfig {
    pub fn new(format: RosterFormat) -> Self {
        Self {
            format,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Write the roster to `path` in the configured format.
pub fn write_roster(
    path: &Path,
    rows: &[TieredMember],
    config: &WriterConfig,
) -> Result<(), ExportError> {
    ensure_parent(path)?;
    match config.format {
        RosterFormat::Csv => write_csv(path, rows)?,
        RosterFormat::Json => write_json_document(path, rows)?,
        RosterFormat::Parquet => write_parquet(path, rows, config.batch_size)?,
    }
    info!(
        path = %path.display(),
        format = %config.format,
        rows = rows.len(),
        "roster written"
    );
    Ok(())
}

/// Serialize any value as pretty JSON to `path`.
pub fn write_json_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[TieredMember]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        // serialize() only emits the header alongside the first record
        writer.write_record(crate::schema::ROSTER_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[TieredMember], batch_size: usize) -> Result<(), ExportError> {
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::try_new(3)?))
        .build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, roster_schema(), Some(props))?;

    for chunk in rows.chunks(batch_size.max(1)) {
        let batch = roster_batch(chunk)?;
        writer.write(&batch)?;
        debug!(rows = chunk.len(), "parquet batch written");
    }
    writer.close()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
