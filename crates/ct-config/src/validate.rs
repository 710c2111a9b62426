//! Semantic validation of a resolved configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tiering::{TieringConfig, MAX_EXCLUSION_DAYS};

/// A single configuration violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All violations found in a configuration. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check cross-field constraints that serde cannot express.
pub fn validate(config: &TieringConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !ct_common::schema::is_compatible(&config.schema_version) {
        errors.push(ValidationError::new(
            "schema_version",
            format!(
                "unsupported schema version {} (expected {}.x)",
                config.schema_version,
                crate::CONFIG_SCHEMA_VERSION
                    .split('.')
                    .next()
                    .unwrap_or("1")
            ),
        ));
    }

    if config.tier2_threshold > config.tier1_threshold {
        errors.push(ValidationError::new(
            "tier2_threshold",
            format!(
                "must not exceed tier1_threshold ({} > {})",
                config.tier2_threshold, config.tier1_threshold
            ),
        ));
    }

    if config.exclusion_days > MAX_EXCLUSION_DAYS {
        errors.push(ValidationError::new(
            "exclusion_days",
            format!(
                "must not exceed {MAX_EXCLUSION_DAYS} ({} given)",
                config.exclusion_days
            ),
        ));
    }

    if config.workers == 0 {
        errors.push(ValidationError::new("workers", "must be at least 1"));
    }

    ValidationResult { errors }
}
