//! Command-line interface.
//!
//! Provides run, describe, config show, schema, and completions commands.
//! Every runner returns an [`ExitCode`]; JSON output uses the shared
//! envelope (`schema_version`, `run_id`, `generated_at`, `command`).

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ct_common::{Error, OutputFormat, RosterFormat, RunId, TieredMember, SCHEMA_VERSION};
use ct_config::{
    resolve_config, ConfigOverrides, ConfigPaths, ConfigSnapshot, ResolvedConfig, TieringConfig,
};
use ct_export::{write_json_document, write_roster, WriterConfig};
use serde::Serialize;
use tracing::{debug, error};

use crate::describe::DescriptiveReport;
use crate::exit_codes::ExitCode;
use crate::load::{self, dates::parse_date, LoadOutcome};
use crate::logging::LogFormat;
use crate::pipeline::{run_pipeline, PipelineParams, ReferenceDateSource};
use crate::report::{render_describe_text, render_run_text, InputCounts, RunSummary};

/// Care-management utilization tiering.
#[derive(Parser, Debug)]
#[command(name = "ct-core", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (TOML or JSON)
    #[arg(long, global = true, env = "CT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Format for stdout
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Format for stderr logs
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tier eligible members and export the roster
    Run(RunArgs),
    /// Descriptive statistics over the input extracts
    Describe(DescribeArgs),
    /// Inspect configuration
    Config(ConfigArgs),
    /// Print the JSON Schema of an output or the config file
    Schema {
        #[arg(value_enum)]
        target: SchemaTarget,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Events extract (member_profile_id, event_type, start_date, end_date)
    #[arg(long, value_name = "CSV")]
    pub events: PathBuf,

    /// Diagnoses extract (member_profile_id, disease_group, diagnosis_date)
    #[arg(long, value_name = "CSV")]
    pub diagnoses: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Roster destination; the roster is printed to stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Roster format (defaults to the output extension, then csv)
    #[arg(long, value_enum)]
    pub format: Option<RosterFormat>,

    /// Also write the run summary JSON here
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    /// Exported roster rows
    Roster,
    /// Run summary document
    Summary,
    /// Config file
    Config,
}

/// Per-run overrides of config file values.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Anchor date for the exclusion lookback (default: latest event date)
    #[arg(long, env = "CT_REFERENCE_DATE", value_parser = parse_date_arg, value_name = "DATE")]
    pub reference_date: Option<NaiveDate>,

    /// Minimum ED rate for Tier 1
    #[arg(long, env = "CT_TIER1_THRESHOLD")]
    pub tier1_threshold: Option<u32>,

    /// Minimum ED rate for Tier 2
    #[arg(long, env = "CT_TIER2_THRESHOLD")]
    pub tier2_threshold: Option<u32>,

    /// Trailing window length in days, excluding the event day
    #[arg(long, env = "CT_WINDOW_DAYS")]
    pub window_days: Option<u32>,

    /// Admission lookback in days before the reference date
    #[arg(long, env = "CT_EXCLUSION_DAYS")]
    pub exclusion_days: Option<u32>,

    /// Worker threads for the rolling-window pass
    #[arg(long, env = "CT_WORKERS")]
    pub workers: Option<usize>,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            reference_date: self.reference_date,
            tier1_threshold: self.tier1_threshold,
            tier2_threshold: self.tier2_threshold,
            window_days: self.window_days,
            exclusion_days: self.exclusion_days,
            workers: self.workers,
        }
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a date (expected YYYY-MM-DD)"))
}

/// An error together with the exit code it should produce.
#[derive(Debug)]
struct Failure {
    code: ExitCode,
    error: Error,
}

impl Failure {
    /// Anything that goes wrong while reading an input extract.
    fn input(error: Error) -> Self {
        Self {
            code: ExitCode::InputError,
            error,
        }
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Self {
            code: ExitCode::from(&error),
            error,
        }
    }
}

type CliResult = std::result::Result<ExitCode, Failure>;

/// Dispatch a parsed command line.
pub fn run_cli(cli: &Cli) -> ExitCode {
    let global = &cli.global;
    let (name, result) = match &cli.command {
        Commands::Run(args) => ("run", run_tiering(global, args)),
        Commands::Describe(args) => ("describe", run_describe(global, args)),
        Commands::Config(ConfigArgs {
            command: ConfigCommands::Show { overrides },
        }) => ("config show", run_config_show(global, overrides)),
        Commands::Schema { target } => ("schema", run_schema(*target)),
        Commands::Completions { shell } => ("completions", run_completions(*shell)),
    };
    match result {
        Ok(code) => code,
        Err(failure) => report_failure(global.output_format, name, failure),
    }
}

fn report_failure(format: OutputFormat, command: &str, failure: Failure) -> ExitCode {
    error!(command, code = failure.error.code(), error = %failure.error, "command failed");
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": Utc::now().to_rfc3339(),
                "command": command,
                "error": {
                    "code": failure.error.code(),
                    "message": failure.error.to_string(),
                },
                "exit_code": failure.code.as_i32(),
            });
            if print_json(&output).is_err() {
                eprintln!("error: {}", failure.error);
            }
        }
        OutputFormat::Text => eprintln!("error: {}", failure.error),
    }
    failure.code
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve(global: &GlobalArgs, overrides: &OverrideArgs) -> Result<ResolvedConfig, Error> {
    let paths = ConfigPaths::discover(global.config.clone());
    let resolved = resolve_config(&paths, &overrides.to_overrides())?;
    debug!(source = %resolved.source, "configuration resolved");
    Ok(resolved)
}

struct Inputs {
    events: LoadOutcome<ct_common::Event>,
    diagnoses: Option<LoadOutcome<ct_common::Diagnosis>>,
}

impl Inputs {
    fn load(args: &InputArgs) -> Result<Self, Failure> {
        let events = load::load_events(&args.events).map_err(Failure::input)?;
        let diagnoses = args
            .diagnoses
            .as_deref()
            .map(load::load_diagnoses)
            .transpose()
            .map_err(Failure::input)?;
        Ok(Self { events, diagnoses })
    }

    fn diagnoses(&self) -> &[ct_common::Diagnosis] {
        self.diagnoses
            .as_ref()
            .map(|d| d.records.as_slice())
            .unwrap_or_default()
    }

    fn counts(&self) -> InputCounts {
        InputCounts {
            events_loaded: self.events.records.len(),
            events_skipped: self.events.skipped.len(),
            diagnoses_loaded: self.diagnoses.as_ref().map_or(0, |d| d.records.len()),
            diagnoses_skipped: self.diagnoses.as_ref().map_or(0, |d| d.skipped.len()),
        }
    }

    fn into_skipped(self) -> Vec<load::SkippedRecord> {
        let mut skipped = self.events.skipped;
        if let Some(dx) = self.diagnoses {
            skipped.extend(dx.skipped);
        }
        skipped
    }
}

fn roster_format(args: &RunArgs, output: &Path) -> RosterFormat {
    args.format
        .or_else(|| RosterFormat::from_path(output))
        .unwrap_or_default()
}

fn run_tiering(global: &GlobalArgs, args: &RunArgs) -> CliResult {
    let run_id = RunId::new();
    let resolved = resolve(global, &args.overrides)?;
    let inputs = Inputs::load(&args.input)?;

    let params = PipelineParams::resolve(&resolved.config, &inputs.events.records);
    let outcome = run_pipeline(&inputs.events.records, &params);

    let counts = inputs.counts();
    let skipped = inputs.into_skipped();
    let skipped_total = skipped.len();
    let mut summary = RunSummary::new(
        &run_id,
        ConfigSnapshot::capture(&resolved),
        &params,
        counts,
        &outcome,
        skipped,
    );

    if let Some(output) = &args.output {
        let writer = WriterConfig::new(roster_format(args, output));
        write_roster(output, &outcome.roster, &writer).map_err(Error::from)?;
        summary = summary.with_roster_path(output.display().to_string());
    }
    if let Some(path) = &args.summary {
        write_json_document(path, &summary).map_err(Error::from)?;
    }

    match global.output_format {
        OutputFormat::Json => {
            let mut output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id.0,
                "generated_at": summary.generated_at,
                "command": "run",
                "summary": summary,
            });
            if args.output.is_none() {
                output["roster"] = serde_json::to_value(&outcome.roster).map_err(Error::from)?;
            }
            print_json(&output)?;
        }
        OutputFormat::Text => {
            print!("{}", render_run_text(&summary));
            if args.output.is_none() {
                print_roster_table(&outcome.roster);
            }
        }
    }

    Ok(ExitCode::completed(skipped_total))
}

fn print_roster_table(roster: &[TieredMember]) {
    println!();
    println!("## Roster");
    for member in roster {
        println!(
            "  {:<24} {:>4}  {}",
            member.member_id, member.ed_rate, member.tier
        );
    }
}

fn run_describe(global: &GlobalArgs, args: &DescribeArgs) -> CliResult {
    let inputs = Inputs::load(&args.input)?;
    let report = DescriptiveReport::build(&inputs.events.records, inputs.diagnoses());
    let counts = inputs.counts();
    let skipped_total = counts.events_skipped + counts.diagnoses_skipped;

    match global.output_format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": RunId::new().0,
                "generated_at": Utc::now().to_rfc3339(),
                "command": "describe",
                "inputs": counts,
                "report": report,
            });
            print_json(&output)?;
        }
        OutputFormat::Text => print!("{}", render_describe_text(&report)),
    }
    Ok(ExitCode::completed(skipped_total))
}

fn run_config_show(global: &GlobalArgs, overrides: &OverrideArgs) -> CliResult {
    let resolved = resolve(global, overrides)?;
    let snapshot = ConfigSnapshot::capture(&resolved);
    let reference_date_source = match snapshot.config.reference_date {
        Some(_) => ReferenceDateSource::Configured,
        None => ReferenceDateSource::LatestEvent,
    };

    match global.output_format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": Utc::now().to_rfc3339(),
                "command": "config show",
                "source": snapshot.source,
                "reference_date_source": reference_date_source,
                "sha256": snapshot.sha256,
                "config": snapshot.config,
            });
            print_json(&output)?;
        }
        OutputFormat::Text => {
            let c = &snapshot.config;
            println!("# Configuration ({})", snapshot.source);
            println!();
            match c.reference_date {
                Some(date) => println!("  reference_date = {date}"),
                None => println!("  reference_date = (latest event date)"),
            }
            println!("  tier1_threshold = {}", c.tier1_threshold);
            println!("  tier2_threshold = {}", c.tier2_threshold);
            println!("  window_days = {}", c.window_days);
            println!("  exclusion_days = {}", c.exclusion_days);
            println!("  workers = {}", c.workers);
            println!();
            println!("  sha256 = {}", snapshot.sha256);
        }
    }
    Ok(ExitCode::Clean)
}

fn run_schema(target: SchemaTarget) -> CliResult {
    let schema = match target {
        SchemaTarget::Roster => schemars::schema_for!(Vec<TieredMember>),
        SchemaTarget::Summary => schemars::schema_for!(RunSummary),
        SchemaTarget::Config => schemars::schema_for!(TieringConfig),
    };
    print_json(&schema)?;
    Ok(ExitCode::Clean)
}

fn run_completions(shell: Shell) -> CliResult {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ct-core", &mut std::io::stdout());
    Ok(ExitCode::Clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "ct-core",
            "--output-format",
            "json",
            "run",
            "--events",
            "events.csv",
            "--reference-date",
            "2020-12-31",
            "--tier1-threshold",
            "10",
            "-o",
            "roster.parquet",
        ])
        .unwrap();
        assert_eq!(cli.global.output_format, OutputFormat::Json);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(
            args.overrides.reference_date,
            NaiveDate::from_ymd_opt(2020, 12, 31)
        );
        assert_eq!(args.overrides.tier1_threshold, Some(10));
        let output = args.output.clone().unwrap();
        assert_eq!(roster_format(&args, &output), RosterFormat::Parquet);
    }

    #[test]
    fn explicit_format_beats_extension() {
        let cli = Cli::try_parse_from([
            "ct-core", "run", "--events", "e.csv", "-o", "out.txt", "--format", "json",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(
            roster_format(&args, Path::new("out.txt")),
            RosterFormat::Json
        );
    }

    #[test]
    fn rejects_bad_reference_date() {
        let err = Cli::try_parse_from([
            "ct-core",
            "run",
            "--events",
            "e.csv",
            "--reference-date",
            "yesterday",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn input_failures_use_input_exit_code() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(Failure::input(io).code, ExitCode::InputError);
    }
}
