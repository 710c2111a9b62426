//! Eligibility → rolling window → tier classification.
//!
//! Everything here operates on validated events and cannot fail.

use chrono::NaiveDate;
use ct_common::{Event, EventType, TieredMember};
use ct_config::{TierThresholds, TieringConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::eligibility::{apply_eligibility, Eligibility};
use crate::tier::{classify_members, reportable, TierCounts};
use crate::window::{member_rates, rolling_counts_parallel, MemberRate, UtilizationRecord};

/// How the reference date was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDateSource {
    Configured,
    /// No date configured; the latest event start date was used.
    LatestEvent,
    /// No date configured and no events loaded.
    Unset,
}

/// Fully resolved pipeline parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineParams {
    pub reference_date: NaiveDate,
    pub reference_date_source: ReferenceDateSource,
    pub cutoff: NaiveDate,
    pub window_days: u32,
    pub thresholds: TierThresholds,
    pub workers: usize,
}

impl PipelineParams {
    /// Resolve parameters against the loaded events.
    pub fn resolve(config: &TieringConfig, events: &[Event]) -> Self {
        let (reference_date, reference_date_source) = match config.reference_date {
            Some(date) => (date, ReferenceDateSource::Configured),
            None => match events.iter().map(|e| e.start_date).max() {
                Some(latest) => {
                    warn!(
                        reference_date = %latest,
                        "no reference date configured; using latest event start date"
                    );
                    (latest, ReferenceDateSource::LatestEvent)
                }
                None => (NaiveDate::default(), ReferenceDateSource::Unset),
            },
        };
        Self {
            reference_date,
            reference_date_source,
            cutoff: config.cutoff_for(reference_date),
            window_days: config.window_days,
            thresholds: config.thresholds(),
            workers: config.workers.max(1),
        }
    }
}

/// Every product of a tiering run.
#[derive(Debug, Clone)]
pub struct TieringOutcome {
    pub eligibility: Eligibility,
    pub utilization: Vec<UtilizationRecord>,
    /// One row per eligible member, ordered by member id.
    pub rates: Vec<MemberRate>,
    /// `rates` with tiers attached, Low included.
    pub classified: Vec<TieredMember>,
    /// Tier 1 and Tier 2 members only.
    pub roster: Vec<TieredMember>,
    pub tier_counts: TierCounts,
}

/// Run the tiering pipeline over validated events.
pub fn run_pipeline(events: &[Event], params: &PipelineParams) -> TieringOutcome {
    let eligibility = apply_eligibility(events, params.cutoff);
    let utilization =
        rolling_counts_parallel(&eligibility.events, params.window_days, params.workers);
    let rates = member_rates(
        &eligibility.eligible_members,
        &utilization,
        EventType::EdVisit,
    );
    let classified = classify_members(&rates, &params.thresholds);
    let roster = reportable(&classified);
    let tier_counts = TierCounts::tally(&classified);

    info!(
        tier1 = tier_counts.tier1,
        tier2 = tier_counts.tier2,
        low = tier_counts.low,
        roster = roster.len(),
        "tiering complete"
    );

    TieringOutcome {
        eligibility,
        utilization,
        rates,
        classified,
        roster,
        tier_counts,
    }
}
