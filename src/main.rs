//! Decklist-Harvest main entry point
//!
//! This is the command-line interface for the tournament decklist harvester.

use anyhow::Context;
use clap::Parser;
use decklist_harvest::config::{load_or_default, Config};
use decklist_harvest::crawler::{harvest, Harvester};
use decklist_harvest::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Decklist-Harvest: tournament results and decklists to JSON
///
/// Crawls the format index of a results site, every event it lists and
/// every decklist of those events, and writes one JSON document per event
/// plus a manifest.
#[derive(Parser, Debug)]
#[command(name = "decklist-harvest")]
#[command(version)]
#[command(about = "Harvests tournament decklists into JSON", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("invalid configuration");
        }
    };

    if cli.dry_run {
        return handle_dry_run(config);
    }

    match harvest(config).await {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("decklist_harvest=info,warn"),
            1 => EnvFilter::new("decklist_harvest=debug,info"),
            _ => EnvFilter::new("decklist_harvest=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows where the harvest would read and write
fn handle_dry_run(config: Config) -> anyhow::Result<()> {
    let harvester = Harvester::new(config.clone())?;

    println!("=== Decklist-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Index page: {}", harvester.index_url()?);
    println!("  Decklist export: {}<id>", harvester.decklist_url("")?);
    println!("  Allowed domains: {}", config.site.allowed_domains.join(", "));
    println!("  Request delay: {}ms", config.crawler.request_delay);

    println!("\nOutput:");
    println!("  Season directory: {}", harvester.store().root().display());
    println!("  Manifest: {}", harvester.store().manifest_path().display());

    println!("\n✓ Configuration is valid");

    Ok(())
}
