//! `gitalchemist` -- build git repositories with a scripted history.
//!
//! Parses the CLI with clap, resolves the layered settings, installs the
//! log subscriber and dispatches to the command handlers. The process exit
//! code reports the kind of the first failure.

mod cli;
mod commands;
mod context;

use std::process::ExitCode;

use alchemist_config::load_settings;
use alchemist_formula::{BracketFormat, ErrorKind};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::Level;

use cli::{Cli, Mode};
use context::RuntimeContext;

/// Exit code for usage and settings errors.
const EXIT_USAGE: u8 = 1;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let ctx = match setup(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let result = match cli.mode() {
        Mode::Clean => commands::clean::run(&ctx),
        Mode::RunAll => commands::run::run_all(&ctx),
        Mode::Tasks(tasks) => commands::run::run_tasks(&ctx, &tasks),
    };

    match result {
        Ok(()) => {
            tracing::info!("ok");
            ExitCode::SUCCESS
        }
        Err(err) => ExitCode::from(exit_code(err.kind())),
    }
}

/// Resolve the settings and install the log subscriber.
fn setup(cli: &Cli) -> Result<RuntimeContext> {
    let settings =
        load_settings(cli.config.as_deref(), &cli.overrides()).context("loading settings")?;
    let level = if settings.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .event_format(BracketFormat)
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("installing the log subscriber")?;
    Ok(RuntimeContext::new(settings))
}

/// Process exit code for a failure of the given kind.
fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::MissingValue => 2,
        ErrorKind::InvalidValue => 3,
        ErrorKind::Decode => 4,
        ErrorKind::Execution => 5,
        ErrorKind::Io => 6,
    }
}
