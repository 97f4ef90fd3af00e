//! Binary entry point for the docsel CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Show how an expression is understood
//! docsel parse -t 'method:10-20,7'
//!
//! # List the tests and examples an expression keeps
//! docsel select tree.json -t 'part_a.*method' -t 'function:2-'
//!
//! # Dry-run the selected tests
//! docsel run tree.json -t 'TypeB.method:0-3' --module pkg.mod
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use docsel::cli::{execute_parse, execute_run, execute_select};
use docsel_core::config::{self, CliOverrides, OutputFormat, ResolvedConfig};
use docsel_core::error::DocselError;
use docsel_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Select individual documentation tests and examples.
///
/// A filter expression is a whitespace-separated list of filters. Each
/// filter is `NAME` or `NAME:RANGES`, where `NAME` matches the end of a
/// test's dotted name (`*` matches anything) and `RANGES` is a comma list
/// of `N`, `N-M`, `N-` or `-M` example indices.
#[derive(Parser, Debug)]
#[command(name = "docsel", version, about = "Select documentation tests and examples")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output (default: warn, or DOCSEL_LOG).
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Output format (default: json, or DOCSEL_FORMAT).
    #[arg(long, global = true, value_enum)]
    format: Option<Format>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for config::LogLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => config::LogLevel::Trace,
            LogLevel::Debug => config::LogLevel::Debug,
            LogLevel::Info => config::LogLevel::Info,
            LogLevel::Warn => config::LogLevel::Warn,
            LogLevel::Error => config::LogLevel::Error,
        }
    }
}

/// Output format for responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed JSON.
    Json,
    /// Human-readable text.
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a filter expression and print the filters.
    Parse {
        /// Filter to apply (repeatable; joined with spaces).
        #[arg(short = 't', long = "test")]
        tests: Vec<String>,
    },
    /// Print the tests and examples selected from a test tree.
    Select {
        /// JSON test tree, or `-` for stdin.
        tree: PathBuf,
        /// Filter to apply (repeatable; joined with spaces).
        #[arg(short = 't', long = "test")]
        tests: Vec<String>,
        /// Module to select from (default: the only module in the tree).
        #[arg(long)]
        module: Option<String>,
    },
    /// Dry-run the selected tests and report counts.
    Run {
        /// JSON test tree, or `-` for stdin.
        tree: PathBuf,
        /// Filter to apply (repeatable; joined with spaces).
        #[arg(short = 't', long = "test")]
        tests: Vec<String>,
        /// Module to run (default: the only module in the tree).
        #[arg(long)]
        module: Option<String>,
    },
}

impl Command {
    fn filters(&self) -> &[String] {
        match self {
            Command::Parse { tests } | Command::Select { tests, .. } | Command::Run { tests, .. } => {
                tests
            }
        }
    }
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            filters: self.command.filters().to_vec(),
            log_level: self.global.log_level.map(Into::into),
            output_format: self.global.format.map(Into::into),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ResolvedConfig::resolve(&cli.overrides()) {
        Ok(config) => config,
        Err(err) => {
            init_tracing(config::LogLevel::default());
            return report_error(&DocselError::from(err), OutputFormat::default());
        }
    };

    init_tracing(config.log_level.value);

    match execute(cli.command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => report_error(&err, config.output_format.value),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: config::LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Report an error and map it to the process exit code.
fn report_error(err: &DocselError, format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Json => {
            // Errors go to stdout as JSON so callers parse one stream
            let _ = emit_response(&ErrorResponse::from_error(err), &mut io::stdout());
            let _ = io::stdout().flush();
        }
        OutputFormat::Text => {
            eprintln!("error: {err}");
        }
    }
    ExitCode::from(err.error_code().code())
}

/// Execute the CLI command. Returns whether every run example passed.
fn execute(command: Command, config: &ResolvedConfig) -> Result<bool, DocselError> {
    let mut stdout = io::stdout().lock();
    match command {
        Command::Parse { .. } => execute_parse(config, &mut stdout).map(|()| true),
        Command::Select { tree, module, .. } => {
            execute_select(config, &tree, module.as_deref(), &mut stdout).map(|()| true)
        }
        Command::Run { tree, module, .. } => {
            execute_run(config, &tree, module.as_deref(), &mut stdout)
        }
    }
}
