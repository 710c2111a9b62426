//! Run summaries and human-readable rendering.

use chrono::{NaiveDate, Utc};
use ct_common::{RunId, Tier, SCHEMA_VERSION};
use ct_config::ConfigSnapshot;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::describe::DescriptiveReport;
use crate::load::SkippedRecord;
use crate::pipeline::{PipelineParams, ReferenceDateSource, TieringOutcome};
use crate::tier::TierCounts;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InputCounts {
    pub events_loaded: usize,
    pub events_skipped: usize,
    pub diagnoses_loaded: usize,
    pub diagnoses_skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MemberCounts {
    pub total: usize,
    pub eligible: usize,
    pub excluded: usize,
}

/// Machine-readable record of one `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunSummary {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: String,
    pub config: ConfigSnapshot,
    pub reference_date: NaiveDate,
    pub reference_date_source: ReferenceDateSource,
    pub cutoff_date: NaiveDate,
    pub inputs: InputCounts,
    pub members: MemberCounts,
    pub tier_counts: TierCounts,
    pub roster_size: usize,
    /// Where the roster was written, if anywhere.
    pub roster_path: Option<String>,
    pub skipped: Vec<SkippedRecord>,
}

impl RunSummary {
    pub fn new(
        run_id: &RunId,
        config: ConfigSnapshot,
        params: &PipelineParams,
        inputs: InputCounts,
        outcome: &TieringOutcome,
        skipped: Vec<SkippedRecord>,
    ) -> Self {
        let eligible = outcome.eligibility.eligible_members.len();
        let excluded = outcome.eligibility.excluded_members.len();
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: run_id.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            config,
            reference_date: params.reference_date,
            reference_date_source: params.reference_date_source,
            cutoff_date: params.cutoff,
            inputs,
            members: MemberCounts {
                total: eligible + excluded,
                eligible,
                excluded,
            },
            tier_counts: outcome.tier_counts,
            roster_size: outcome.roster.len(),
            roster_path: None,
            skipped,
        }
    }

    pub fn with_roster_path(mut self, path: impl Into<String>) -> Self {
        self.roster_path = Some(path.into());
        self
    }
}

/// Text rendering of a run summary.
pub fn render_run_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Care tiering run {}\n\n", summary.run_id));
    let reference_note = match summary.reference_date_source {
        ReferenceDateSource::Configured => "",
        ReferenceDateSource::LatestEvent => " (latest event)",
        ReferenceDateSource::Unset => " (no events)",
    };
    out.push_str(&format!(
        "  Reference date: {}{}\n",
        summary.reference_date, reference_note
    ));
    out.push_str(&format!("  Exclusion cutoff: {}\n", summary.cutoff_date));
    out.push_str(&format!("  Config: {}\n\n", summary.config.source));
    out.push_str(&format!(
        "  Events: {} loaded, {} skipped\n",
        summary.inputs.events_loaded, summary.inputs.events_skipped
    ));
    if summary.inputs.diagnoses_loaded + summary.inputs.diagnoses_skipped > 0 {
        out.push_str(&format!(
            "  Diagnoses: {} loaded, {} skipped\n",
            summary.inputs.diagnoses_loaded, summary.inputs.diagnoses_skipped
        ));
    }
    out.push_str(&format!(
        "  Members: {} total, {} eligible, {} excluded\n\n",
        summary.members.total, summary.members.eligible, summary.members.excluded
    ));
    for tier in Tier::ALL {
        let label = format!("{tier}:");
        out.push_str(&format!(
            "  {label:<7} {}\n",
            summary.tier_counts.get(tier)
        ));
    }
    match &summary.roster_path {
        Some(path) => out.push_str(&format!(
            "  Roster: {} members -> {}\n",
            summary.roster_size, path
        )),
        None => out.push_str(&format!("  Roster: {} members\n", summary.roster_size)),
    }
    if !summary.skipped.is_empty() {
        out.push_str(&format!("\n## Skipped records ({})\n", summary.skipped.len()));
        for record in &summary.skipped {
            out.push_str(&format!("  {record}\n"));
        }
    }
    out
}

/// Text rendering of the descriptive report.
pub fn render_describe_text(report: &DescriptiveReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Claims overview ({} events, {} members)\n\n",
        report.total_events, report.total_members
    ));

    out.push_str("## Event types\n");
    for row in &report.event_types {
        out.push_str(&format!(
            "  {:<10} {:>8}  {:>6.2}%\n",
            row.event_type.as_str(),
            row.count,
            row.percent
        ));
    }
    out.push('\n');

    out.push_str("## Duration (days)\n");
    for row in &report.durations {
        match &row.days {
            Some(s) => out.push_str(&format!(
                "  {:<10} n={} mean={:.2} median={:.1} min={} max={}\n",
                row.event_type.as_str(),
                s.count,
                s.mean,
                s.median,
                s.min,
                s.max
            )),
            None => out.push_str(&format!("  {:<10} no events\n", row.event_type.as_str())),
        }
    }
    out.push('\n');

    out.push_str("## Recurrence\n");
    for row in &report.recurrence {
        out.push_str(&format!(
            "  {:<10} {} members, {} recurrent ({:.2}%), {:.2} events/member\n",
            row.event_type.as_str(),
            row.members_with_event,
            row.recurrent_members,
            row.recurrence_percent,
            row.mean_events_per_member
        ));
    }

    if !report.diseases.is_empty() {
        out.push_str(&format!(
            "\n## Disease groups ({} diagnosed members)\n",
            report.diagnosed_members
        ));
        for row in &report.diseases {
            out.push_str(&format!(
                "  {:<30} {:>6}  {:>6.2}%\n",
                row.disease_group, row.members, row.percent
            ));
        }
    }
    out
}
