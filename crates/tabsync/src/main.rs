//! tabsync CLI - synchronized code tabs.
//!
//! Provides commands for:
//! - `render`: Pre-render tab navigation and the stored selection into a page
//! - `labels`: List the tab groups of a page and their labels
//! - `pref get` / `pref set`: Inspect or change the stored selection

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{LabelsArgs, PrefCommand, RenderArgs};
use output::Output;

/// tabsync - Synchronized code tabs.
#[derive(Parser)]
#[command(name = "tabsync", version, about)]
struct Cli {
    /// Enable informational logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page with tab navigation and the stored selection applied.
    Render(RenderArgs),
    /// List tab groups and their labels.
    Labels(LabelsArgs),
    /// Stored selection commands.
    #[command(subcommand)]
    Pref(PrefCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Labels(args) => args.execute(),
        Commands::Pref(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO, otherwise `RUST_LOG` applies, defaulting to WARN
/// when it is unset, empty or invalid.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
