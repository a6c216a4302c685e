// crates/feedlens-cli/src/main.rs
// ============================================================================
// Module: Feedlens CLI Entry Point
// Description: Command dispatcher for analytics fetches and offline checks.
// Purpose: Fetch, validate, and inspect analytics resources from a shell.
// Dependencies: clap, feedlens-client, feedlens-config, feedlens-core, serde, tokio
// ============================================================================

//! ## Overview
//! The `feedlens` binary runs the analytics fetch pipeline against a live API
//! (`fetch`), replays it offline on a saved payload (`validate`), prints the
//! contract table (`contracts`), and checks configuration (`config check`).
//! Exit codes: `0` on success, `1` on any failure, `2` when a payload
//! violates its contract.
//!
//! Security posture: payload files and API responses are untrusted; reads
//! are size-capped and credentials never reach stdout.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use feedlens_client::AnalyticsClient;
use feedlens_client::FetchOptions;
use feedlens_config::FeedlensConfig;
use feedlens_core::BodyCheck;
use feedlens_core::ConsistencyReport;
use feedlens_core::EmptyPolicy;
use feedlens_core::FetchError;
use feedlens_core::FetchErrorKind;
use feedlens_core::FieldKind;
use feedlens_core::FieldViolation;
use feedlens_core::ResourceKind;
use feedlens_core::check_body;
use feedlens_core::contracts;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a payload file given to `validate`.
const MAX_PAYLOAD_BYTES: usize = 64 * 1024 * 1024;
/// Exit status reported when a payload violates its contract.
const VIOLATION_EXIT: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "feedlens", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one resource from the analytics API and report on it.
    Fetch(FetchCommand),
    /// Validate and analyze a saved JSON payload without network access.
    Validate(ValidateCommand),
    /// Print the resource contract table as JSON.
    Contracts,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `fetch`.
#[derive(Args, Debug)]
struct FetchCommand {
    /// Resource name (word_cloud, feed_analysis, image_analysis, post_list, statistics).
    #[arg(value_parser = parse_resource)]
    resource: ResourceKind,
    /// Account identifier to fetch.
    id: String,
    /// Optional config file path (defaults to feedlens.toml or `FEEDLENS_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides `api.base_url`.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Overrides `api.timeout_ms`.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
    /// Writes one JSON fetch event to stderr.
    #[arg(long)]
    log_events: bool,
    /// Includes the validated payload in the output.
    #[arg(long)]
    payload: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Resource name the payload should match.
    #[arg(value_parser = parse_resource)]
    resource: ResourceKind,
    /// Path to a JSON payload file.
    file: PathBuf,
    /// Includes the validated payload in the output.
    #[arg(long)]
    payload: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate configuration.
    Check(ConfigCheckCommand),
}

/// Arguments for `config check`.
#[derive(Args, Debug)]
struct ConfigCheckCommand {
    /// Optional config file path (defaults to feedlens.toml or `FEEDLENS_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying the message shown on stderr.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors returned by bounded file reads.
#[derive(Debug, Error)]
enum ReadLimitError {
    /// File I/O failure.
    #[error("{0}")]
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// JSON report printed for a checked payload.
#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    /// Resource checked.
    resource: ResourceKind,
    /// Identifier fetched; absent for offline checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<&'a str>,
    /// True when a "no data" collection was empty.
    no_data: bool,
    /// Consistency findings and statistics.
    report: &'a ConsistencyReport,
    /// Validated payload when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a Value>,
}

/// JSON report printed when a payload violates its contract.
#[derive(Debug, Serialize)]
struct ViolationOutput<'a> {
    /// Resource checked.
    resource: ResourceKind,
    /// Contract violations in detection order.
    violations: &'a [FieldViolation],
}

/// One row of the contract table.
#[derive(Debug, Serialize)]
struct ContractRow {
    /// Resource name.
    resource: ResourceKind,
    /// Default route path.
    route: &'static str,
    /// Query parameter carrying the identifier.
    query_param: &'static str,
    /// Required top-level fields.
    required_fields: Vec<&'static str>,
    /// Empty policy of each top-level list or keyed record.
    empty_policies: BTreeMap<&'static str, EmptyPolicy>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(command) => command_fetch(command).await,
        Commands::Validate(command) => command_validate(&command),
        Commands::Contracts => command_contracts(),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Check(command) => command_config_check(&command),
        },
    }
}

// ============================================================================
// SECTION: Fetch Command
// ============================================================================

/// Executes the `fetch` command.
async fn command_fetch(command: FetchCommand) -> CliResult<ExitCode> {
    let mut config = FeedlensConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    apply_overrides(&mut config, &command);
    let client = AnalyticsClient::from_config(&config)
        .map_err(|err| CliError::new(format!("failed to build client: {err}")))?;
    let result =
        client.fetch_checked(command.resource, &command.id, &FetchOptions::default()).await;
    report_check(command.resource, Some(command.id.trim()), result, command.payload)
}

/// Applies command-line overrides on top of loaded configuration.
fn apply_overrides(config: &mut FeedlensConfig, command: &FetchCommand) {
    if let Some(base_url) = &command.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = command.timeout_ms {
        config.api.timeout_ms = timeout_ms;
    }
    if command.log_events {
        config.logging.enabled = true;
    }
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes the `validate` command.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let body = read_payload(&command.file)?;
    let result = check_body(command.resource, body);
    report_check(command.resource, None, result, command.payload)
}

/// Reads and parses a JSON payload file.
fn read_payload(path: &Path) -> CliResult<Value> {
    let bytes = read_bytes_with_limit(path, MAX_PAYLOAD_BYTES).map_err(|err| {
        CliError::new(format!("failed to read payload {}: {err}", path.display()))
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("payload {} is not valid JSON: {err}", path.display())))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Contract and Config Commands
// ============================================================================

/// Executes the `contracts` command.
fn command_contracts() -> CliResult<ExitCode> {
    write_json(&contract_rows())?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the contract table rows in table order.
fn contract_rows() -> Vec<ContractRow> {
    contracts()
        .map(|contract| ContractRow {
            resource: contract.resource,
            route: contract.resource.default_route(),
            query_param: contract.resource.query_param(),
            required_fields: contract.required_fields().collect(),
            empty_policies: contract
                .fields
                .iter()
                .filter_map(|field| match field.kind {
                    FieldKind::Array {
                        spec,
                    } => Some((field.name, spec.empty)),
                    FieldKind::Record {
                        empty, ..
                    } => Some((field.name, empty)),
                    _ => None,
                })
                .collect(),
        })
        .collect()
}

/// Executes `config check`.
fn command_config_check(command: &ConfigCheckCommand) -> CliResult<ExitCode> {
    let config = FeedlensConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line(&format!("config ok (api.base_url = {})", config.api.base_url))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Reporting
// ============================================================================

/// Prints a check result and picks the exit code.
fn report_check(
    resource: ResourceKind,
    resource_id: Option<&str>,
    result: Result<BodyCheck, FetchError>,
    include_payload: bool,
) -> CliResult<ExitCode> {
    match result {
        Ok(checked) => {
            write_json(&CheckOutput {
                resource,
                resource_id,
                no_data: checked.no_data,
                report: &checked.report,
                payload: include_payload.then_some(&checked.payload),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.kind == FetchErrorKind::SchemaViolation => {
            write_json(&ViolationOutput {
                resource,
                violations: err.violations(),
            })?;
            write_stderr_line(&err.message)
                .map_err(|io_err| CliError::new(output_error("stderr", &io_err)))?;
            Ok(ExitCode::from(VIOLATION_EXIT))
        }
        Err(err) => Err(CliError::new(format!("{} error: {err}", err.kind.as_str()))),
    }
}

/// Parses a resource name for clap.
fn parse_resource(value: &str) -> Result<ResourceKind, String> {
    value.parse::<ResourceKind>().map_err(|err| {
        let names: Vec<&str> = ResourceKind::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("{err} (expected one of: {})", names.join(", "))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render json: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
