//! Tiering configuration types.
//!
//! Every field has a default so a partial file (or no file at all) yields a
//! complete configuration. Thresholds are supplied constants, never fitted.

use chrono::{Duration, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::CONFIG_SCHEMA_VERSION;

/// Default ED rate at or above which a member is Tier 1.
pub const DEFAULT_TIER1_THRESHOLD: u32 = 8;

/// Default ED rate at or above which a member is Tier 2.
pub const DEFAULT_TIER2_THRESHOLD: u32 = 3;

/// Default trailing window length: an event counts every same-type event
/// dated at most this many days before it (inclusive 365-day window).
pub const DEFAULT_WINDOW_DAYS: u32 = 364;

/// Default look-back for the recent-Admission exclusion.
pub const DEFAULT_EXCLUSION_DAYS: u32 = 365;

/// Longest accepted Admission look-back (100 years).
pub const MAX_EXCLUSION_DAYS: u32 = 36_525;

/// Tier cut points applied to a member's peak ED rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TierThresholds {
    /// `ed_rate >= tier1` → Tier 1.
    pub tier1: u32,
    /// `tier2 <= ed_rate < tier1` → Tier 2; below → Low.
    pub tier2: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            tier1: DEFAULT_TIER1_THRESHOLD,
            tier2: DEFAULT_TIER2_THRESHOLD,
        }
    }
}

/// Complete tiering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TieringConfig {
    pub schema_version: String,

    /// Analysis reference date. The Admission exclusion cutoff is
    /// `reference_date - exclusion_days`. When unset, the latest event
    /// start date in the loaded dataset is used.
    pub reference_date: Option<NaiveDate>,

    /// Peak ED rate at or above which a member is Tier 1.
    pub tier1_threshold: u32,

    /// Peak ED rate at or above which a member is Tier 2.
    pub tier2_threshold: u32,

    /// Trailing window length in days (364 = inclusive 365-day window).
    pub window_days: u32,

    /// Admission look-back in days for the eligibility exclusion.
    pub exclusion_days: u32,

    /// Worker threads for the per-partition window computation.
    pub workers: usize,
}

impl Default for TieringConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            reference_date: None,
            tier1_threshold: DEFAULT_TIER1_THRESHOLD,
            tier2_threshold: DEFAULT_TIER2_THRESHOLD,
            window_days: DEFAULT_WINDOW_DAYS,
            exclusion_days: DEFAULT_EXCLUSION_DAYS,
            workers: 1,
        }
    }
}

impl TieringConfig {
    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds {
            tier1: self.tier1_threshold,
            tier2: self.tier2_threshold,
        }
    }

    /// Exclusion cutoff for a given reference date. Saturates at
    /// [`NaiveDate::MIN`] when the look-back runs past the calendar range.
    pub fn cutoff_for(&self, reference_date: NaiveDate) -> NaiveDate {
        reference_date
            .checked_sub_signed(Duration::days(i64::from(self.exclusion_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_program_constants() {
        let cfg = TieringConfig::default();
        assert_eq!(cfg.tier1_threshold, 8);
        assert_eq!(cfg.tier2_threshold, 3);
        assert_eq!(cfg.window_days, 364);
        assert_eq!(cfg.exclusion_days, 365);
        assert_eq!(cfg.workers, 1);
        assert!(cfg.reference_date.is_none());
        assert_eq!(cfg.thresholds(), TierThresholds::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = TieringConfig::from_toml(
            "reference_date = \"2020-06-30\"\ntier1_threshold = 10\n",
        )
        .unwrap();
        assert_eq!(cfg.reference_date, NaiveDate::from_ymd_opt(2020, 6, 30));
        assert_eq!(cfg.tier1_threshold, 10);
        assert_eq!(cfg.tier2_threshold, 3);
        assert_eq!(cfg.window_days, 364);
    }

    #[test]
    fn json_round_trip() {
        let cfg = TieringConfig {
            reference_date: NaiveDate::from_ymd_opt(2021, 1, 1),
            workers: 4,
            ..Default::default()
        };
        let text = serde_json::to_string(&cfg).unwrap();
        assert_eq!(TieringConfig::from_json(&text).unwrap(), cfg);
    }

    #[test]
    fn cutoff_subtracts_exclusion_days() {
        let cfg = TieringConfig::default();
        let reference = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(
            cfg.cutoff_for(reference),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn cutoff_follows_configured_exclusion_days() {
        let cfg = TieringConfig {
            exclusion_days: 30,
            ..Default::default()
        };
        let reference = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(
            cfg.cutoff_for(reference),
            NaiveDate::from_ymd_opt(2020, 12, 1).unwrap()
        );
    }

    #[test]
    fn huge_exclusion_window_saturates_instead_of_panicking() {
        let cfg = TieringConfig {
            exclusion_days: u32::MAX,
            ..Default::default()
        };
        let reference = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(cfg.cutoff_for(reference), NaiveDate::MIN);
    }
}
