//! Tracklist Harvest main entry point
//!
//! This is the command-line interface for the resumable tracklist crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracklist_harvest::catalog::load_catalog;
use tracklist_harvest::config::{load_config_with_hash, Config};
use tracklist_harvest::crawler::run_crawl;
use tracklist_harvest::storage::{CheckpointStore, JsonCheckpointStore};

/// Tracklist Harvest: a resumable track-list crawler
///
/// Walks a catalog of mixtapes and shows, fetches every episode's tracklist
/// from the upstream API and writes one deduplicated tracklist file per
/// show. Finished shows are checkpointed so re-running after a failure only
/// redoes what is missing.
#[derive(Parser, Debug)]
#[command(name = "tracklist-harvest")]
#[command(version)]
#[command(about = "A resumable track-list crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore the existing checkpoint and re-harvest every show
    #[arg(long)]
    fresh: bool,

    /// Validate config and catalog and show what would be crawled
    #[arg(long, conflicts_with_all = ["stats", "fresh"])]
    dry_run: bool,

    /// Show statistics over the harvested output and exit
    #[arg(long, conflicts_with_all = ["dry_run", "fresh"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tracklist_harvest=info,warn"),
            1 => EnvFilter::new("tracklist_harvest=debug,info"),
            2 => EnvFilter::new("tracklist_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled without network access
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let catalog = load_catalog(Path::new(&config.input.catalog_path))?;
    let checkpoint = JsonCheckpointStore::load(Path::new(&config.output.checkpoint_path));

    println!("=== Tracklist Harvest Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Guest path prefix: {}", config.api.guest_path_prefix);

    println!("\nThrottling:");
    println!(
        "  {} requests/s (burst {})",
        config.crawler.requests_per_second,
        config.crawler.burst()
    );
    println!("  Page size: {}", config.crawler.page_size);
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);

    println!("\nOutput:");
    println!("  Root: {}", config.output.root);
    println!("  Checkpoint: {}", config.output.checkpoint_path);

    println!("\nMixtapes ({}):", catalog.results.len());
    for mixtape in &catalog.results {
        let done = mixtape
            .credits
            .iter()
            .filter(|show| checkpoint.is_done(&show.name))
            .count();
        let guests = mixtape
            .credits
            .iter()
            .filter(|show| show.is_guest(&config.api.guest_path_prefix))
            .count();
        println!(
            "  - {} ({} shows, {} guest, {} done)",
            mixtape.mixtape_alias,
            mixtape.credits.len(),
            guests,
            done
        );
    }

    let total = catalog.show_count();
    let remaining = catalog
        .shows()
        .filter(|(_, show)| !checkpoint.is_done(&show.name))
        .count();

    println!("\n✓ Configuration and catalog are valid");
    println!("✓ Would harvest {} of {} shows", remaining, total);

    Ok(())
}

/// Handles the --stats mode: tallies the output tree
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use tracklist_harvest::output::{load_statistics, print_statistics};

    println!("Output root: {}\n", config.output.root);

    let stats = load_statistics(Path::new(&config.output.root))
        .with_context(|| format!("failed to read output tree {}", config.output.root))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring checkpoint, existing output is merged)");
    } else {
        tracing::info!("Starting crawl (resuming from checkpoint if present)");
    }

    let summary = run_crawl(config, fresh).await.context("crawl aborted")?;

    if summary.is_complete() {
        tracing::info!(
            "All {} shows attempted, {} tracks written",
            summary.total_shows,
            summary.totals.tracks_written
        );
    }

    if !summary.failed_shows.is_empty() {
        tracing::warn!(
            "{} shows failed and will be retried on the next run: {}",
            summary.failed_shows.len(),
            summary.failed_shows.join(", ")
        );
    }

    Ok(())
}
