//! stackcraft CLI - build-plan resolution for curated Haskell snapshots.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod oracle;
mod output;

use clap::Parser;
use commands::{Cli, Commands};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let force_ansi = if cli.ansi {
        Some(true)
    } else if cli.no_ansi {
        Some(false)
    } else {
        None
    };
    output::init(force_ansi, cli.quiet);
    if cli.json {
        output::json::enable();
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    match runtime.block_on(run_command(&cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::json::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Resolve(args) => commands::resolve::run(args).await,
        Commands::PickSnapshot(args) => commands::pick_snapshot::run(args).await,
    }
}
