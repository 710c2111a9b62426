//! Care tiering configuration loading and validation.
//!
//! This crate provides:
//! - The typed tiering configuration (thresholds, window lengths, reference date)
//! - Config resolution (CLI/env → explicit file → XDG file → defaults)
//! - Semantic validation
//! - Config snapshots for run summaries

pub mod resolve;
pub mod snapshot;
pub mod tiering;
pub mod validate;

pub use resolve::{resolve_config, ConfigError, ConfigOverrides, ConfigPaths, ConfigSource, ResolvedConfig};
pub use snapshot::ConfigSnapshot;
pub use tiering::{TierThresholds, TieringConfig};
pub use validate::{validate, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "care_tiering";

/// File name looked up inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";
