// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stjcheck::app_config::{Config, LogLevel, OutputFormat};
use stjcheck::file_utils::FileManager;
use stjcheck::repair::OverlapRepairer;
use stjcheck::{Document, Issue, ValidationReport, ValidationService};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate STJ documents
    Validate(ValidateArgs),

    /// Repair overlapping segments and write the result to a new file
    Repair(RepairArgs),

    /// Generate shell completions for stjcheck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// STJ file, or directory searched recursively for .json files
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Base URI for resolving relative source URIs
    #[arg(long)]
    base_uri: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "stjcheck.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct RepairArgs {
    /// STJ file to repair
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the repaired document
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "stjcheck.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// stjcheck - Standard Transcription JSON validator
#[derive(Parser, Debug)]
#[command(name = "stjcheck")]
#[command(version)]
#[command(about = "Validate and repair STJ transcript documents")]
#[command(long_about = "stjcheck checks Standard Transcription JSON documents and reports every problem it finds.

EXAMPLES:
    stjcheck validate talk.stj.json                 # Validate one document
    stjcheck validate --format json transcripts/    # Validate a directory, JSON report
    stjcheck validate --strict talk.stj.json        # Fail on warnings too
    stjcheck repair talk.stj.json fixed.stj.json    # Repair overlapping segments
    stjcheck completions bash > stjcheck.bash       # Generate bash completions

CONFIGURATION:
    Settings are read from stjcheck.json by default. You can specify a different
    file with --config-path. A missing file means all defaults.

EXIT STATUS:
    0 when every document is valid, 1 otherwise.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                marker,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<ExitCode> {
    // Logger accepts everything; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "stjcheck", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate(args) => run_validate(args),
        Commands::Repair(args) => run_repair(args),
    }
}

/// Load config and apply the log level, CLI flag taking precedence
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    if let Some(level) = log_level {
        log::set_max_level(LogLevel::from(level).to_level_filter());
    }

    if !Path::new(config_path).exists() {
        debug!("Config file not found at '{}', using defaults.", config_path);
    }
    let mut config = Config::load_or_default(config_path)?;

    match log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }
    Ok(config)
}

/// Outcome of checking one file
enum FileOutcome {
    Checked(ValidationReport),
    Unreadable(String),
}

impl FileOutcome {
    fn passes(&self, strict: bool) -> bool {
        match self {
            FileOutcome::Checked(report) => report.passes(strict),
            FileOutcome::Unreadable(_) => false,
        }
    }
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode> {
    let mut config = load_config(&args.config_path, args.log_level)?;
    if let Some(format) = args.format {
        config.output = format.into();
    }
    if args.strict {
        config.validation.strict = true;
    }
    if let Some(base_uri) = args.base_uri {
        config.validation.base_uri = Some(base_uri);
    }
    config.validate().context("Configuration validation failed")?;

    let files = FileManager::collect_inputs(&args.path)?;
    if files.is_empty() {
        warn!("No documents found under {}", args.path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let strict = config.validation.strict;
    let service = ValidationService::with_config(config.validation.clone());

    let progress = (files.len() > 1).then(|| {
        let bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    });

    let mut outcomes = Vec::with_capacity(files.len());
    for path in &files {
        if let Some(bar) = &progress {
            bar.set_message(path.display().to_string());
        }
        let outcome = match Document::load_from_file(path) {
            Ok(document) => FileOutcome::Checked(service.validate_report(&document)),
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                FileOutcome::Unreadable(e.to_string())
            }
        };
        outcomes.push((path.clone(), outcome));
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let failed = outcomes.iter().filter(|(_, outcome)| !outcome.passes(strict)).count();
    match config.output {
        OutputFormat::Text => print_text_report(&outcomes, strict),
        OutputFormat::Json => print_json_report(&outcomes, strict)?,
    }

    info!("{} of {} documents passed", files.len() - failed, files.len());
    Ok(if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn print_text_report(outcomes: &[(PathBuf, FileOutcome)], strict: bool) {
    for (path, outcome) in outcomes {
        match outcome {
            FileOutcome::Unreadable(message) => {
                println!("{}: UNREADABLE ({})", path.display(), message);
            }
            FileOutcome::Checked(report) => {
                let status = if report.passes(strict) { "OK" } else { "FAILED" };
                println!("{}: {} ({})", path.display(), status, report.summary());
                for issue in &report.issues {
                    println!("  {} {}", issue.severity, issue);
                }
            }
        }
    }
}

fn print_json_report(outcomes: &[(PathBuf, FileOutcome)], strict: bool) -> Result<()> {
    let entries: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|(path, outcome)| match outcome {
            FileOutcome::Unreadable(message) => serde_json::json!({
                "file": path.display().to_string(),
                "valid": false,
                "error": message,
                "issues": [],
            }),
            FileOutcome::Checked(report) => serde_json::json!({
                "file": path.display().to_string(),
                "valid": report.passes(strict),
                "issues": report.issues.iter().map(Issue::to_dict).collect::<Vec<_>>(),
            }),
        })
        .collect();

    let text = serde_json::to_string_pretty(&entries).context("Failed to serialize report")?;
    println!("{}", text);
    Ok(())
}

fn run_repair(args: RepairArgs) -> Result<ExitCode> {
    let config = load_config(&args.config_path, args.log_level)?;
    config.validate().context("Configuration validation failed")?;

    FileManager::ensure_writable(&args.output, args.force_overwrite)?;

    let document = Document::load_from_file(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let service = ValidationService::with_config(config.validation.clone());
    let outcome = match OverlapRepairer::with_config(config.repair.clone()).repair_checked(&document, &service) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Not repairing {}: {}", args.input.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };
    for issue in &outcome.issues {
        println!("{} {}", issue.severity, issue);
    }

    outcome
        .document
        .save_to_file(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        "Wrote {} with {} overlaps repaired",
        args.output.display(),
        outcome.repairs
    );

    let remaining = service.validate_report(&outcome.document);
    if !remaining.is_valid() {
        warn!("Repaired document still has issues: {}", remaining.summary());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
