//! Output format selectors.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How command results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON envelope with schema_version and run_id
    Json,
}

/// File format for the exported roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// JSON array of roster rows
    Json,
    /// Apache Parquet (ZSTD compressed)
    Parquet,
}

impl RosterFormat {
    /// Conventional file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            RosterFormat::Csv => "csv",
            RosterFormat::Json => "json",
            RosterFormat::Parquet => "parquet",
        }
    }

    /// Infer a format from a path's extension, if it is one we write.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(RosterFormat::Csv),
            "json" => Some(RosterFormat::Json),
            "parquet" | "pq" => Some(RosterFormat::Parquet),
            _ => None,
        }
    }
}

impl fmt::Display for RosterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
