//! Claims ingestion.
//!
//! Reads the events and diagnoses CSV extracts into validated in-memory
//! records. Record-level defects (missing member id, unknown event type,
//! end before start) are collected as [`SkippedRecord`] diagnostics and the
//! load continues. Unparseable date fields and missing header columns abort
//! the load.

mod columns;
pub mod dates;
pub mod diagnoses;
pub mod diagnostics;
pub mod events;

use serde::Serialize;

pub use diagnoses::{load_diagnoses, read_diagnoses};
pub use diagnostics::{RecordSource, SkipReason, SkippedRecord};
pub use events::{load_events, read_events};

/// Records that passed validation plus the ones that did not.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> LoadOutcome<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

fn csv_reader<R: std::io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}
