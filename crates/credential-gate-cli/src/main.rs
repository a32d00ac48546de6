// crates/credential-gate-cli/src/main.rs
// ============================================================================
// Module: Credential Gate CLI Entry Point
// Description: Command dispatcher for credential validation workflows.
// Purpose: Validate credential files, run fixture suites, and inspect schemas.
// Dependencies: clap, credential-gate-config, credential-gate-core, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The Credential Gate CLI validates credential documents against the builtin
//! (or configured) schemas and runtime rules, runs tiered fixture suites, and
//! lists schema availability. All user-facing strings are routed through the
//! message catalog.
//!
//! Exit codes: `0` when every document is valid or every fixture passes, `1`
//! when a document is invalid or a fixture fails, `2` on any usage, input,
//! configuration, or schema error. Security posture: inputs are untrusted;
//! every file read is size-capped.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use credential_gate_cli::report::DocumentReport;
use credential_gate_cli::report::FixtureRunReport;
use credential_gate_cli::setup::build_engine;
use credential_gate_cli::setup::schema_location;
use credential_gate_cli::t;
use credential_gate_config::CredentialGateConfig;
use credential_gate_config::FixtureManifest;
use credential_gate_core::ReferenceTime;
use credential_gate_core::SchemaRef;
use credential_gate_core::ValidationEngine;
use credential_gate_core::ValidationMode;
use credential_gate_core::classify;
use credential_gate_core::detect_schema_ref;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Exit code for invalid documents and failed fixtures.
const EXIT_INVALID: u8 = 1;
/// Exit code for usage, input, configuration, and schema errors.
const EXIT_ERROR: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "credential-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate credential documents.
    Validate(ValidateCommand),
    /// Run a tiered fixture suite directory.
    Fixtures(FixturesCommand),
    /// List schemas and check that each resolves.
    Schemas(SchemasCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigArgs),
}

/// Shared config path argument.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to credential-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Credential documents (JSON).
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
    /// Schema reference such as `developer/v1`, or `auto` to detect per document.
    #[arg(long, value_name = "REF", default_value = "auto")]
    schema: String,
    /// Reference instant (RFC 3339 or YYYY-MM-DD); defaults to now.
    #[arg(long, value_name = "TIME")]
    reference_time: Option<String>,
    /// Skip the runtime rules.
    #[arg(long, action = ArgAction::SetTrue)]
    structural_only: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for `fixtures`.
#[derive(Args, Debug)]
struct FixturesCommand {
    /// Fixture directory holding `valid-*`, `invalid-*`, and `tier2-invalid-*` JSON files.
    #[arg(long, value_name = "DIR")]
    dir: PathBuf,
    /// Schema reference; overrides the manifest.
    #[arg(long, value_name = "REF")]
    schema: Option<String>,
    /// Manifest path (defaults to `fixtures.toml` inside the directory).
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,
    /// Reference instant; overrides the manifest, defaults to now.
    #[arg(long, value_name = "TIME")]
    reference_time: Option<String>,
    /// Skip the runtime rules.
    #[arg(long, action = ArgAction::SetTrue)]
    structural_only: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for `schemas`.
#[derive(Args, Debug)]
struct SchemasCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Output formats for reports.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

/// Schema selection for `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaChoice {
    /// Detect each document's schema.
    Auto,
    /// Validate every document against one schema.
    Fixed(SchemaRef),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        return Err(CliError::new(t!("main.no_command")));
    };
    match command {
        Commands::Validate(command) => command_validate(&command),
        Commands::Fixtures(command) => command_fixtures(&command),
        Commands::Schemas(command) => command_schemas(&command),
        Commands::Config {
            command: ConfigCommand::Validate(args),
        } => command_config_validate(&args),
    }
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes the `validate` command.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let engine = engine_for(&config, command.structural_only)?;
    let schema = parse_schema_choice(&command.schema)?;
    let reference_time = resolve_reference_time(command.reference_time.as_deref(), None)?;
    let mut reports = Vec::with_capacity(command.files.len());
    for path in &command.files {
        let document = read_document(path, config.validation.max_document_bytes)?;
        let schema_ref = match schema {
            SchemaChoice::Fixed(schema_ref) => schema_ref,
            SchemaChoice::Auto => detect_schema_ref(&document).ok_or_else(|| {
                CliError::new(t!("schema.detect_failed", path = path.display()))
            })?,
        };
        let verdict = engine
            .validate(&document, schema_ref, reference_time)
            .map_err(|err| CliError::new(t!("schema.resolve_failed", error = err)))?;
        reports.push(DocumentReport::new(
            path.display().to_string(),
            schema_ref,
            reference_time,
            verdict,
        ));
    }
    match command.format {
        OutputFormat::Json => write_json(&reports)?,
        OutputFormat::Text => {
            for report in &reports {
                write_lines(&report.render_text())?;
            }
        }
    }
    let all_valid = reports.iter().all(|report| report.verdict.is_valid());
    Ok(if all_valid { ExitCode::SUCCESS } else { ExitCode::from(EXIT_INVALID) })
}

// ============================================================================
// SECTION: Fixtures Command
// ============================================================================

/// Executes the `fixtures` command.
fn command_fixtures(command: &FixturesCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let manifest = match &command.manifest {
        Some(path) => FixtureManifest::load(path),
        None => FixtureManifest::load_dir(&command.dir),
    }
    .map_err(|err| CliError::new(t!("fixtures.manifest_failed", error = err)))?;
    let schema_ref = match &command.schema {
        Some(value) => parse_schema_ref(value)?,
        None => manifest.schema.ok_or_else(|| {
            CliError::new(t!("fixtures.schema_missing", path = command.dir.display()))
        })?,
    };
    let reference_time =
        resolve_reference_time(command.reference_time.as_deref(), manifest.reference_time)?;
    let engine = engine_for(&config, command.structural_only)?;

    let mut report =
        FixtureRunReport::new(command.dir.display().to_string(), schema_ref, reference_time);
    for path in fixture_files(&command.dir)? {
        let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(case) = manifest.case_for(&name) else {
            continue;
        };
        let document = read_document(&path, config.validation.max_document_bytes)?;
        let verdict = engine
            .validate(&document, schema_ref, reference_time)
            .map_err(|err| CliError::new(t!("schema.resolve_failed", error = err)))?;
        let classification = classify(&verdict, &case);
        report.record(case.name, case.expectation, classification, verdict);
    }
    match command.format {
        OutputFormat::Json => write_json(&report)?,
        OutputFormat::Text => write_lines(&report.render_text())?,
    }
    if report.summary.total == 0 {
        let _ = write_stderr_line(&t!("fixtures.none_found", path = command.dir.display()));
    }
    Ok(if report.summary.all_passed() { ExitCode::SUCCESS } else { ExitCode::from(EXIT_INVALID) })
}

/// Lists fixture JSON files in name order.
fn fixture_files(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let dir_error = |err: std::io::Error| {
        CliError::new(t!("fixtures.dir_failed", path = dir.display(), error = err))
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ============================================================================
// SECTION: Schemas Command
// ============================================================================

/// Executes the `schemas` command.
fn command_schemas(command: &SchemasCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let engine = engine_for(&config, false)?;
    let mut all_resolved = true;
    for schema_ref in SchemaRef::all() {
        let location = schema_location(&config, schema_ref);
        let line = match engine.registry().resolve(schema_ref) {
            Ok(_) => t!("schemas.entry.ok", schema = schema_ref, location = location),
            Err(err) => {
                all_resolved = false;
                t!("schemas.entry.failed", schema = schema_ref, location = location, error = err)
            }
        };
        write_stdout_line(&line)?;
    }
    Ok(if all_resolved { ExitCode::SUCCESS } else { ExitCode::from(EXIT_ERROR) })
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    let source = config
        .source_path
        .as_ref()
        .map_or_else(|| t!("config.validate.defaults"), |path| path.display().to_string());
    write_stdout_line(&t!("config.validate.ok", source = source))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Setup Helpers
// ============================================================================

/// Loads configuration from the standard locations.
fn load_config(args: &ConfigArgs) -> CliResult<CredentialGateConfig> {
    CredentialGateConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the engine, honoring `--structural-only`.
fn engine_for(config: &CredentialGateConfig, structural_only: bool) -> CliResult<ValidationEngine> {
    let mode = structural_only.then_some(ValidationMode::StructuralOnly);
    build_engine(config, mode).map_err(|err| CliError::new(t!("setup.failed", error = err)))
}

/// Parses a `--schema` value for `validate`.
fn parse_schema_choice(value: &str) -> CliResult<SchemaChoice> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(SchemaChoice::Auto);
    }
    parse_schema_ref(value).map(SchemaChoice::Fixed)
}

/// Parses an explicit schema reference.
fn parse_schema_ref(value: &str) -> CliResult<SchemaRef> {
    value
        .trim()
        .parse::<SchemaRef>()
        .map_err(|err| CliError::new(t!("schema.ref_invalid", error = err)))
}

/// Resolves the reference time: flag, then fallback, then now.
fn resolve_reference_time(
    flag: Option<&str>,
    fallback: Option<ReferenceTime>,
) -> CliResult<ReferenceTime> {
    match flag {
        Some(value) => ReferenceTime::parse(value.trim()).map_err(|err| {
            CliError::new(t!("reference_time.invalid", value = value, error = err))
        }),
        None => Ok(fallback.unwrap_or_else(ReferenceTime::now)),
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a credential document.
fn read_document(path: &Path, max_bytes: usize) -> CliResult<Value> {
    let kind = t!("input.kind.document");
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(error) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = error))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes several lines to stdout.
fn write_lines(lines: &[String]) -> CliResult<()> {
    for line in lines {
        write_stdout_line(line)?;
    }
    Ok(())
}

/// Writes pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_stdout_line(&rendered)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_ERROR)
}
