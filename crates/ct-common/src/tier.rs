//! Utilization tier labels and the tiered roster row.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::MemberId;

/// Care-management utilization tier.
///
/// Ordered from lowest to highest utilization so that `Tier::Tier1` is the
/// maximum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Tier {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 1")]
    Tier1,
}

impl Tier {
    /// All tiers, highest first (roster/report order).
    pub const ALL: [Tier; 3] = [Tier::Tier1, Tier::Tier2, Tier::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Tier1 => "Tier 1",
            Tier::Tier2 => "Tier 2",
            Tier::Low => "Low",
        }
    }

    /// Whether members in this tier belong on the exported roster.
    pub fn is_reportable(self) -> bool {
        !matches!(self, Tier::Low)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the tiered roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TieredMember {
    pub member_id: MemberId,
    /// Peak trailing-window ED visit count.
    pub ed_rate: u32,
    pub tier: Tier,
}
