//! `stackcraft` command-line entry point.

pub mod pick_snapshot;
pub mod resolve;

use clap::{Parser, Subcommand};

/// Build-plan resolution for curated Haskell snapshots.
#[derive(Parser, Debug)]
#[command(name = "stackcraft", author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
#[command(styles = get_styles())]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Force ANSI colors even when stdout is not a terminal
    #[arg(long, global = true, conflicts_with = "no_ansi")]
    pub ansi: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    pub no_ansi: bool,

    /// Emit machine-readable JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize a snapshot and resolve an install plan for one or more targets
    Resolve(resolve::ResolveArgs),

    /// Classify candidate snapshots against a set of local packages
    #[command(name = "pick-snapshot")]
    PickSnapshot(pick_snapshot::PickSnapshotArgs),
}

fn get_styles() -> clap::builder::Styles {
    use clap::builder::styling::AnsiColor;
    clap::builder::Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}
