mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docsync",
    about = "Keep generated project documentation in sync with the source tree",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .docsync.yaml or .git/)
    #[arg(long, global = true, env = "DOCSYNC_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring the documentation set and quick-reference file up to date
    Refresh {
        /// Create the project index without asking
        #[arg(long, short = 'y')]
        yes: bool,

        /// Skip project-index creation
        #[arg(long, conflicts_with = "yes")]
        no_index: bool,

        /// Compute and report the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show artifact presence, the strategy a refresh would take, and
    /// pending changes
    Status,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Refresh {
            yes,
            no_index,
            dry_run,
        } => cmd::refresh::run(&root, yes, no_index, dry_run, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
