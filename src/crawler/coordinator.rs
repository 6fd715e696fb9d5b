//! Crawl coordinator - walks the catalog and drives the show pipeline
//!
//! Mixtapes and their shows are processed strictly in input order, one at a
//! time. The single shared rate limiter is the only throttle, so running
//! shows side by side would not get past the upstream's rate ceiling any
//! faster.

use crate::catalog::{load_catalog, Catalog};
use crate::config::Config;
use crate::crawler::pipeline::{ShowOutcome, ShowPipeline};
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::totals::{CrawlSummary, CrawlTotals};
use crate::crawler::build_http_client;
use crate::storage::{CheckpointStore, JsonCheckpointStore};
use crate::HarvestError;
use std::path::Path;
use std::sync::Arc;

/// Main crawl driver
#[derive(Debug, Clone)]
pub struct CrawlDriver {
    pipeline: ShowPipeline,
}

impl CrawlDriver {
    /// Creates a driver with its own HTTP client and rate limiter
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlDriver)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent)?;
        let limiter = Arc::new(RateLimiter::from_config(&config.crawler));

        tracing::debug!(
            "Throttling to {} requests/s (burst {})",
            limiter.requests_per_second(),
            limiter.burst()
        );

        Ok(Self::with_pipeline(ShowPipeline::new(config, client, limiter)))
    }

    pub fn with_pipeline(pipeline: ShowPipeline) -> Self {
        Self { pipeline }
    }

    /// Processes every show of the catalog
    ///
    /// Individual show failures are recorded in the summary and never stop
    /// the crawl.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Mixtapes and shows, walked in order
    /// * `checkpoint` - Completion record shared by every show
    ///
    /// # Returns
    ///
    /// Totals for the run and the names of shows that failed
    pub async fn run(
        &self,
        catalog: &Catalog,
        checkpoint: &mut dyn CheckpointStore,
    ) -> CrawlSummary {
        let total_shows = catalog.show_count();
        let mut totals = CrawlTotals::new();
        let mut failed_shows = Vec::new();
        let mut position = 0;

        tracing::info!(
            "Crawling {} shows across {} mixtapes ({} already done)",
            total_shows,
            catalog.results.len(),
            checkpoint.completed_count()
        );

        for mixtape in &catalog.results {
            tracing::info!(
                "Mixtape '{}': {} shows",
                mixtape.mixtape_alias,
                mixtape.credits.len()
            );

            for show in &mixtape.credits {
                position += 1;
                tracing::info!("[{}/{}] {}", position, total_shows, show.name);

                let outcome = self
                    .pipeline
                    .process_show(&mixtape.mixtape_alias, show, checkpoint, &mut totals)
                    .await;

                if let ShowOutcome::Failed { .. } = outcome {
                    failed_shows.push(show.name.clone());
                }
            }
        }

        CrawlSummary {
            total_shows,
            totals,
            failed_shows,
        }
    }
}

/// Runs the main crawl operation
///
/// 1. Load the catalog (fatal if missing or malformed)
/// 2. Load the checkpoint, or start empty when `fresh`
/// 3. Process every show in order
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `fresh` - Ignore the checkpoint on disk
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Every show was attempted
/// * `Err(HarvestError)` - The catalog or HTTP client could not be set up
///
/// # Example
///
/// ```no_run
/// use tracklist_harvest::config::load_config;
/// use tracklist_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_crawl(&config, false).await?;
/// println!("{} tracks written", summary.totals.tracks_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, fresh: bool) -> Result<CrawlSummary, HarvestError> {
    // Load the catalog
    let catalog = load_catalog(Path::new(&config.input.catalog_path))?;

    // Load or reset the checkpoint
    let checkpoint_path = Path::new(&config.output.checkpoint_path);
    let mut checkpoint = if fresh {
        JsonCheckpointStore::empty(checkpoint_path)
    } else {
        JsonCheckpointStore::load(checkpoint_path)
    };

    // Crawl every show
    let driver = CrawlDriver::new(config)?;
    let start_time = std::time::Instant::now();
    let summary = driver.run(&catalog, &mut checkpoint).await;

    tracing::info!(
        "Crawl finished in {:?}: {} processed, {} skipped, {} failed, {} tracks written",
        start_time.elapsed(),
        summary.totals.shows_processed,
        summary.totals.shows_skipped,
        summary.totals.shows_failed,
        summary.totals.tracks_written
    );

    Ok(summary)
}
