//! Care tiering core library.
//!
//! Loads claims extracts, screens members for recent admissions, computes
//! trailing ED visit rates and assigns utilization tiers. The binary in
//! `main.rs` wraps this in the `ct-core` CLI.

pub mod cli;
pub mod describe;
pub mod eligibility;
pub mod exit_codes;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod tier;
pub mod window;

pub use describe::DescriptiveReport;
pub use eligibility::{apply_eligibility, Eligibility};
pub use exit_codes::ExitCode;
pub use load::{load_diagnoses, load_events, LoadOutcome, SkippedRecord};
pub use pipeline::{run_pipeline, PipelineParams, ReferenceDateSource, TieringOutcome};
pub use report::RunSummary;
pub use tier::{classify, TierCounts};
pub use window::{member_rates, rolling_counts, rolling_counts_parallel, MemberRate};
