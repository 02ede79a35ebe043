use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::workflow::Status;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "event-reconcile")]
#[command(
    about = "Reconciliation toolkit for Markdown+YAML event records: duplicate detection, status workflow, canonical formatting"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without writing files
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory for groups of near-identical events
    Duplicates(DuplicatesArgs),

    /// Check one event file for duplicates against a directory
    Check(CheckArgs),

    /// Summarize a record collection (counts, queues, upcoming)
    Stats(StatsArgs),

    /// Move an event to a new lifecycle status
    Transition(TransitionArgs),

    /// Rewrite event files into canonical frontmatter form
    Fmt(FmtArgs),

    /// Initialize a reconcile.toml config file
    Init(InitArgs),
}

#[derive(Parser)]
pub struct DuplicatesArgs {
    /// Directory of event files to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Minimum pairwise score to count as a duplicate (overrides config)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Emit JSON instead of human text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Event file to check
    pub file: PathBuf,

    /// Directory of candidate event files
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Minimum pairwise score to count as a duplicate (overrides config)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Emit JSON instead of human text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct StatsArgs {
    /// Directory of event files to summarize
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Emit JSON instead of human text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct TransitionArgs {
    /// Event file to update
    pub file: PathBuf,

    /// Target status
    #[arg(value_enum)]
    pub to: StatusArg,
}

/// CLI-facing status tokens; converted to the core enum at the boundary.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Draft,
    Review,
    Pending,
    Approved,
    Published,
    Archived,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => Status::Draft,
            StatusArg::Review => Status::Review,
            StatusArg::Pending => Status::Pending,
            StatusArg::Approved => Status::Approved,
            StatusArg::Published => Status::Published,
            StatusArg::Archived => Status::Archived,
        }
    }
}

#[derive(Parser)]
pub struct FmtArgs {
    /// Directory of event files to rewrite
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Report drifted files and fail instead of rewriting
    #[arg(long)]
    pub check: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}
