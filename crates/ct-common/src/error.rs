//! Error types for care tiering.

use thiserror::Error;

/// Result type alias for care tiering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for care tiering.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Input errors (20-29)
    #[error("{input}:{line}: cannot parse {field} value '{value}' as a date")]
    DataFormat {
        input: String,
        line: u64,
        field: String,
        value: String,
    },

    #[error("{input}: required column '{column}' is missing from the header")]
    MissingColumn { input: String, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Export errors (40-49)
    #[error("export failed: {0}")]
    Export(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::DataFormat { .. } => 20,
            Error::MissingColumn { .. } => 21,
            Error::Csv(_) => 22,
            Error::Export(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether the error originates from the input datasets rather than
    /// configuration or the output side.
    pub fn is_input_error(&self) -> bool {
        (20..30).contains(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_names_field_and_value() {
        let err = Error::DataFormat {
            input: "events.csv".to_string(),
            line: 7,
            field: "start_date".to_string(),
            value: "2019-13-45".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("events.csv:7"));
        assert!(msg.contains("start_date"));
        assert!(msg.contains("2019-13-45"));
        assert!(err.is_input_error());
    }

    #[test]
    fn codes_are_grouped_by_category() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(Error::Export("x".into()).code(), 40);
        assert!(!Error::Export("x".into()).is_input_error());
    }
}
