use anyhow::Result;
use clap::Parser;
use event_reconcile::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; RUST_LOG controls verbosity
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Duplicates(args) => event_reconcile::core::duplicates::run_scan(args, &ctx),
        Commands::Check(args) => event_reconcile::core::duplicates::run_check(args, &ctx),
        Commands::Stats(args) => event_reconcile::core::dashboard::run(args, &ctx),
        Commands::Transition(args) => event_reconcile::core::workflow::run(args, &ctx),
        Commands::Fmt(args) => event_reconcile::core::frontmatter::run_fmt(args, &ctx),
        Commands::Init(args) => event_reconcile::infra::config::init(args, &ctx),
    }
}
