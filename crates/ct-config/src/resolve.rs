//! Configuration resolution.
//!
//! Precedence, highest first:
//! 1. Explicit overrides (CLI flags and their environment variables)
//! 2. An explicitly named config file (must exist)
//! 3. The XDG config file (`<config_dir>/care_tiering/config.toml`, optional)
//! 4. Built-in defaults

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::tiering::TieringConfig;
use crate::validate::{validate, ValidationError};
use crate::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Errors from configuration loading and resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config file extension: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for ct_common::Error {
    fn from(err: ConfigError) -> Self {
        ct_common::Error::Config(err.to_string())
    }
}

/// Candidate config file locations.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// File named on the command line or via `CT_CONFIG`.
    pub explicit: Option<PathBuf>,
    /// Per-user config file; skipped when absent.
    pub xdg: Option<PathBuf>,
}

impl ConfigPaths {
    /// Build the lookup list, filling in the platform config directory.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            xdg: default_config_path(),
        }
    }

    /// Lookup list that never touches the user's config directory.
    pub fn explicit_only(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            xdg: None,
        }
    }
}

/// `<config_dir>/care_tiering/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Per-field overrides. `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub reference_date: Option<NaiveDate>,
    pub tier1_threshold: Option<u32>,
    pub tier2_threshold: Option<u32>,
    pub window_days: Option<u32>,
    pub exclusion_days: Option<u32>,
    pub workers: Option<usize>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut TieringConfig) {
        if let Some(date) = self.reference_date {
            config.reference_date = Some(date);
        }
        if let Some(v) = self.tier1_threshold {
            config.tier1_threshold = v;
        }
        if let Some(v) = self.tier2_threshold {
            config.tier2_threshold = v;
        }
        if let Some(v) = self.window_days {
            config.window_days = v;
        }
        if let Some(v) = self.exclusion_days {
            config.exclusion_days = v;
        }
        if let Some(v) = self.workers {
            config.workers = v;
        }
    }
}

/// Where the base configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "{}", p.display()),
            ConfigSource::Xdg(p) => write!(f, "{} (user config)", p.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A validated configuration plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: TieringConfig,
    pub source: ConfigSource,
}

/// Load a config file, choosing the parser by extension.
pub fn load_file(path: &Path) -> Result<TieringConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("toml") => TieringConfig::from_toml(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        Some("json") => TieringConfig::from_json(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Resolve, apply overrides, and validate.
pub fn resolve_config(
    paths: &ConfigPaths,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let (mut config, source) = if let Some(path) = &paths.explicit {
        (load_file(path)?, ConfigSource::Explicit(path.clone()))
    } else if let Some(path) = paths.xdg.as_ref().filter(|p| p.exists()) {
        (load_file(path)?, ConfigSource::Xdg(path.clone()))
    } else {
        (TieringConfig::default(), ConfigSource::Defaults)
    };
    debug!(source = %source, "loaded base configuration");

    overrides.apply(&mut config);

    let result = validate(&config);
    if !result.is_valid() {
        return Err(ConfigError::Invalid(result.errors));
    }

    Ok(ResolvedConfig { config, source })
}
