//! Tracklist retrieval
//!
//! One request per tracklist. The endpoint is not paginated: whatever the
//! upstream returns in a single response is the whole tracklist.

use crate::crawler::fetcher::fetch_json;
use crate::crawler::rate_limit::RateLimiter;
use crate::dedup::Track;
use crate::HarvestError;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct TracklistPage {
    results: Vec<Track>,
}

/// Retrieves the tracks of one episode (or guest show)
#[derive(Debug, Clone)]
pub struct TracklistFetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
}

impl TracklistFetcher {
    pub fn new(client: Client, limiter: Arc<RateLimiter>) -> Self {
        Self { client, limiter }
    }

    /// Fetches the tracklist at `url`, keeping only artist and title
    pub async fn fetch_tracklist(&self, url: &str) -> Result<Vec<Track>, HarvestError> {
        self.limiter.acquire().await;
        let page: TracklistPage = fetch_json(&self.client, url).await?;
        Ok(page.results)
    }
}
