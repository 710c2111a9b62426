//! Tier classification from peak ED rate.

use ct_common::{Tier, TieredMember};
use ct_config::TierThresholds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::window::MemberRate;

/// Map an ED rate to its tier.
///
/// Total over all rates: `>= tier1` is Tier 1, `[tier2, tier1)` is Tier 2,
/// anything lower is Low. Assumes `tier2 <= tier1`, which config validation
/// enforces; with equal thresholds the Tier 2 band is empty.
pub fn classify(ed_rate: u32, thresholds: &TierThresholds) -> Tier {
    if ed_rate >= thresholds.tier1 {
        Tier::Tier1
    } else if ed_rate >= thresholds.tier2 {
        Tier::Tier2
    } else {
        Tier::Low
    }
}

/// Classify every member rate, preserving input order.
pub fn classify_members(rates: &[MemberRate], thresholds: &TierThresholds) -> Vec<TieredMember> {
    rates
        .iter()
        .map(|rate| TieredMember {
            member_id: rate.member_id.clone(),
            ed_rate: rate.ed_rate,
            tier: classify(rate.ed_rate, thresholds),
        })
        .collect()
}

/// The exported roster: Tier 1 and Tier 2 members only.
pub fn reportable(classified: &[TieredMember]) -> Vec<TieredMember> {
    classified
        .iter()
        .filter(|m| m.tier.is_reportable())
        .cloned()
        .collect()
}

/// Members per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TierCounts {
    pub tier1: usize,
    pub tier2: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn tally(classified: &[TieredMember]) -> Self {
        let mut counts = Self::default();
        for member in classified {
            match member.tier {
                Tier::Tier1 => counts.tier1 += 1,
                Tier::Tier2 => counts.tier2 += 1,
                Tier::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Tier1 => self.tier1,
            Tier::Tier2 => self.tier2,
            Tier::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.tier1 + self.tier2 + self.low
    }
}
