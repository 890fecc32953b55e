// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Binary entry point for the tugrewrite CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Run a recipe over a source tree (writes changed files)
//! tugrewrite run --recipe cleanup.toml src/
//!
//! # Preview the same run as unified diffs
//! tugrewrite run --recipe cleanup.toml --dry-run src/
//!
//! # Check that a file survives parse and print unchanged
//! tugrewrite print src/main/java/Demo.java
//!
//! # List the visitors a recipe can name
//! tugrewrite visitors
//! ```
//!
//! Every command writes one JSON document to stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use tugrewrite::cli::{RunArgs, Workbench};
use tugrewrite_core::error::{OutputErrorCode, RewriteError};
use tugrewrite_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Lossless source rewriting.
///
/// Parses source files into trees that keep every byte of formatting, runs a
/// recipe of visitors over them and prints the result so untouched code
/// stays exactly as written. All output is JSON.
#[derive(Parser, Debug)]
#[command(name = "tugrewrite", version, about = "Lossless source rewriting")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
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

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a recipe document over files and directories.
    ///
    /// Directories are searched recursively for files a language front end
    /// recognizes. Exits with code 5 when any file failed; the other files
    /// are still rewritten.
    Run {
        /// Recipe document (TOML, or JSON with a `.json` extension).
        #[arg(long)]
        recipe: PathBuf,
        /// Report diffs without writing files.
        #[arg(long)]
        dry_run: bool,
        /// Time limit in milliseconds for the recipe over one file.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Files and directories to rewrite.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Parse a file and print it back.
    Print {
        /// File to parse.
        path: PathBuf,
    },
    /// List registered visitors.
    Visitors,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<ExitCode, RewriteError> {
    let workbench = Workbench::new();
    match cli.command {
        Command::Run {
            recipe,
            dry_run,
            timeout_ms,
            paths,
        } => {
            let args = RunArgs {
                dry_run,
                timeout: timeout_ms.map(Duration::from_millis),
            };
            let response = workbench.run(&recipe, &paths, &args)?;
            emit(&response)?;
            Ok(match response.incomplete() {
                Some(err) => ExitCode::from(OutputErrorCode::from(&err).code()),
                None => ExitCode::SUCCESS,
            })
        }
        Command::Print { path } => {
            emit(&workbench.print_file(&path)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Visitors => {
            emit(&workbench.visitors())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn emit(response: &impl Serialize) -> Result<(), RewriteError> {
    emit_response(response, &mut io::stdout()).map_err(|e| RewriteError::internal(e.to_string()))?;
    let _ = io::stdout().flush();
    Ok(())
}
