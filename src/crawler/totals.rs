//! Running totals for progress reporting
//!
//! Owned by the crawl driver and threaded through the show pipeline
//! explicitly. Nothing here is persisted.

/// Per-run accumulator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlTotals {
    /// Sum of the final deduplicated track counts of every processed show
    pub tracks_written: usize,
    pub shows_processed: usize,
    pub shows_skipped: usize,
    pub shows_failed: usize,
}

impl CrawlTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&mut self, tracks: usize) {
        self.shows_processed += 1;
        self.tracks_written += tracks;
    }

    pub fn record_skipped(&mut self) {
        self.shows_skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.shows_failed += 1;
    }

    /// Shows that were either skipped, processed or failed
    pub fn shows_attempted(&self) -> usize {
        self.shows_processed + self.shows_skipped + self.shows_failed
    }
}

/// Outcome of a full crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of show credits in the catalog
    pub total_shows: usize,
    pub totals: CrawlTotals,
    /// Names of shows abandoned this run, in crawl order
    pub failed_shows: Vec<String>,
}

impl CrawlSummary {
    /// True when every show in the catalog was attempted
    ///
    /// This says nothing about whether they all succeeded.
    pub fn is_complete(&self) -> bool {
        self.totals.shows_attempted() == self.total_shows
    }
}
