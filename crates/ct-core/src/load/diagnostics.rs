//! Diagnostics for records rejected during ingestion.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which input a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Events,
    Diagnoses,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::Events => write!(f, "events"),
            RecordSource::Diagnoses => write!(f, "diagnoses"),
        }
    }
}

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingMemberId,
    UnknownEventType { value: String },
    EndBeforeStart { start_date: NaiveDate, end_date: NaiveDate },
    MissingDiseaseGroup,
    /// The CSV reader could not decode the row (wrong field count, bad UTF-8).
    Unreadable { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingMemberId => write!(f, "missing member id"),
            SkipReason::UnknownEventType { value } => {
                write!(f, "unrecognized event type '{value}'")
            }
            SkipReason::EndBeforeStart {
                start_date,
                end_date,
            } => write!(f, "end date {end_date} is before start date {start_date}"),
            SkipReason::MissingDiseaseGroup => write!(f, "missing disease group"),
            SkipReason::Unreadable { message } => write!(f, "unreadable row: {message}"),
        }
    }
}

/// A rejected input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedRecord {
    pub source: RecordSource,
    /// 1-based line in the input file (the header is line 1).
    pub line: u64,
    /// Member id when one could be read.
    pub member_id: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}: {}", self.source, self.line, self.reason)?;
        if let Some(member) = &self.member_id {
            write!(f, " (member {member})")?;
        }
        Ok(())
    }
}
