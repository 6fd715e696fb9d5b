//! Per-show processing
//!
//! For one show: skip if checkpointed, otherwise fetch all episodes and their
//! tracklists, merge with the show's existing output file, rewrite the file,
//! then mark the checkpoint. Any failure abandons the show for this run
//! without touching the checkpoint.

use crate::catalog::Show;
use crate::config::Config;
use crate::crawler::episodes::EpisodeFetcher;
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::totals::CrawlTotals;
use crate::crawler::tracklist::TracklistFetcher;
use crate::dedup::DedupStore;
use crate::state::ShowState;
use crate::storage::{read_tracklist, tracklist_path, write_tracklist, CheckpointStore};
use crate::HarvestError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of processing one show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Checkpoint already marked the show done; no requests were made
    Skipped,

    /// Output rewritten and checkpoint set
    Completed {
        /// Size of the merged, deduplicated set written to disk
        tracks: usize,
        /// Tracks that were not in the previous output file
        new_tracks: usize,
    },

    /// Abandoned for this run
    Failed { reason: String },
}

/// Tracks the state of the show being processed
struct ShowRun<'a> {
    name: &'a str,
    state: ShowState,
}

impl<'a> ShowRun<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            state: ShowState::Pending,
        }
    }

    fn advance(&mut self, next: ShowState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Show '{}': {} -> {}", self.name, self.state, next);
        self.state = next;
        Ok(())
    }

    fn fail(&mut self) {
        tracing::trace!("Show '{}': {} -> {}", self.name, self.state, ShowState::Failed);
        self.state = ShowState::Failed;
    }
}

/// Orchestrates fetching, merging and persisting for one show at a time
#[derive(Debug, Clone)]
pub struct ShowPipeline {
    episodes: EpisodeFetcher,
    tracklists: TracklistFetcher,
    output_root: PathBuf,
    guest_path_prefix: String,
}

impl ShowPipeline {
    /// Creates a pipeline sharing one HTTP client and one request bucket
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl configuration (API base, throttling, output root)
    /// * `client` - HTTP client used for every request
    /// * `limiter` - Bucket shared by episode and tracklist requests
    pub fn new(config: &Config, client: Client, limiter: Arc<RateLimiter>) -> Self {
        Self {
            episodes: EpisodeFetcher::new(
                client.clone(),
                limiter.clone(),
                config.api.base_url.clone(),
                &config.crawler,
            ),
            tracklists: TracklistFetcher::new(client, limiter),
            output_root: PathBuf::from(&config.output.root),
            guest_path_prefix: config.api.guest_path_prefix.clone(),
        }
    }

    /// Processes a single show
    ///
    /// Never returns an error: failures are logged with the show name and
    /// reported as [`ShowOutcome::Failed`] so the crawl can move on.
    ///
    /// # Arguments
    ///
    /// * `mixtape_alias` - Directory name of the owning mixtape
    /// * `show` - The show to harvest
    /// * `checkpoint` - Completion record, consulted and updated
    /// * `totals` - Running counters for this crawl
    ///
    /// # Returns
    ///
    /// How the show ended: skipped, completed with its track counts, or failed
    pub async fn process_show(
        &self,
        mixtape_alias: &str,
        show: &Show,
        checkpoint: &mut dyn CheckpointStore,
        totals: &mut CrawlTotals,
    ) -> ShowOutcome {
        let mut run = ShowRun::new(&show.name);

        if checkpoint.is_done(&show.name) {
            // Pending -> Skipped is always legal
            let _ = run.advance(ShowState::Skipped);
            tracing::info!("Skipping '{}' (already harvested)", show.name);
            totals.record_skipped();
            return ShowOutcome::Skipped;
        }

        match self.harvest(&mut run, mixtape_alias, show, checkpoint).await {
            Ok((tracks, new_tracks)) => {
                totals.record_processed(tracks);
                tracing::info!(
                    "Harvested '{}': {} tracks ({} new), {} written this run",
                    show.name,
                    tracks,
                    new_tracks,
                    totals.tracks_written
                );
                ShowOutcome::Completed { tracks, new_tracks }
            }
            Err(e) => {
                run.fail();
                totals.record_failed();
                tracing::error!("Failed to harvest '{}': {}", show.name, e);
                ShowOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Runs Fetching -> Merging -> Persisted -> Checkpointed
    ///
    /// # Returns
    ///
    /// * `Ok((tracks, new_tracks))` - Merged set size and how many tracks were
    ///   not already on disk
    /// * `Err(HarvestError)` - A request, decode or write failed
    async fn harvest(
        &self,
        run: &mut ShowRun<'_>,
        mixtape_alias: &str,
        show: &Show,
        checkpoint: &mut dyn CheckpointStore,
    ) -> Result<(usize, usize), HarvestError> {
        // Fetch every episode's tracklist
        run.advance(ShowState::Fetching)?;
        let fresh = self.fetch_show_tracks(show).await?;

        // Merge with whatever is already on disk
        run.advance(ShowState::Merging)?;
        let path = tracklist_path(&self.output_root, mixtape_alias, &show.name);
        let existing = read_tracklist(&path);
        let existing_count = existing.len();
        let merged = DedupStore::merge(existing, fresh.into_tracks());
        let new_tracks = merged.len().saturating_sub(existing_count);

        write_tracklist(&path, &merged)?;
        run.advance(ShowState::Persisted)?;
        tracing::debug!("Wrote {} tracks to {}", merged.len(), path.display());

        // Only a persisted show is checkpointed
        checkpoint.mark_done(&show.name)?;
        run.advance(ShowState::Checkpointed)?;

        Ok((merged.len(), new_tracks))
    }

    /// Fetches every episode's tracklist, deduplicating as it goes
    async fn fetch_show_tracks(&self, show: &Show) -> Result<DedupStore, HarvestError> {
        let is_guest = show.is_guest(&self.guest_path_prefix);
        let episodes = self
            .episodes
            .fetch_all_episodes(&show.path, is_guest)
            .await?;

        tracing::info!("Show '{}': {} episodes", show.name, episodes.len());

        let mut store = DedupStore::new();
        for (index, episode) in episodes.iter().enumerate() {
            let Some(href) = episode.tracklist_href() else {
                tracing::warn!(
                    "Episode '{}' of '{}' has no tracklist link, skipping",
                    episode.label(),
                    show.name
                );
                continue;
            };

            let tracks = self.tracklists.fetch_tracklist(href).await?;
            let fetched = tracks.len();
            let added = store.extend(tracks);
            tracing::debug!(
                "Episode {}/{} '{}': {} tracks ({} new)",
                index + 1,
                episodes.len(),
                episode.label(),
                fetched,
                added
            );
        }

        Ok(store)
    }
}
