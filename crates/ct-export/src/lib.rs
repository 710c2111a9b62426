//! Care tiering roster export.
//!
//! This crate provides:
//! - The Arrow schema of the tiered roster
//! - Roster writers for CSV, JSON, and batched, compressed Parquet
//! - A pretty JSON document writer for run summaries and reports

pub mod schema;
pub mod writer;

pub use schema::{roster_schema, roster_batch, ROSTER_COLUMNS};
pub use writer::{write_json_document, write_roster, ExportError, WriterConfig};

/// Default rows per Parquet record batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;
