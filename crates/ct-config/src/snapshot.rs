//! Config snapshots recorded in run summaries.
//!
//! A snapshot pins the exact values a run used together with a content hash,
//! so two rosters can be checked for having been produced under the same
//! parameters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::ResolvedConfig;
use crate::tiering::TieringConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    pub config: TieringConfig,
    /// Human-readable provenance (file path or "built-in defaults").
    pub source: String,
    /// SHA-256 of the canonical JSON form of `config`.
    pub sha256: String,
}

impl ConfigSnapshot {
    pub fn capture(resolved: &ResolvedConfig) -> Self {
        Self::of(&resolved.config, resolved.source.to_string())
    }

    pub fn of(config: &TieringConfig, source: impl Into<String>) -> Self {
        Self {
            config: config.clone(),
            source: source.into(),
            sha256: config_hash(config),
        }
    }
}

/// Hash of the canonical JSON serialization. Field order is fixed by the
/// struct definition, so equal configs hash equally.
pub fn config_hash(config: &TieringConfig) -> String {
    let json = serde_json::to_vec(config).unwrap_or_default();
    hex::encode(Sha256::digest(&json))
}
