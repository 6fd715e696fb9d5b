//! Episode listing
//!
//! Regular shows page through `{base}/{path}/episodes?offset=O&limit=N` until a
//! page comes back empty. Guest shows have no episode list: a single synthetic
//! episode points straight at `{base}/{path}/tracklist`.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{api_url, fetch_json};
use crate::crawler::rate_limit::RateLimiter;
use crate::HarvestError;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;

/// Link relation naming an episode's tracklist endpoint
pub const TRACKLIST_REL: &str = "tracklist";

/// One installment of a show; only its links are used
///
/// Upstream may send `null` or omit either field. Neither makes the page
/// undecodable.
#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Episode {
    /// Name for log messages
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Returns the href of the first `tracklist` link, if any
    pub fn tracklist_href(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == TRACKLIST_REL)
            .map(|link| link.href.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct EpisodePage {
    results: Vec<Episode>,
}

/// Retrieves the ordered episode list of a show
#[derive(Debug, Clone)]
pub struct EpisodeFetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
    base_url: String,
    page_size: u32,
    page_delay: Duration,
}

impl EpisodeFetcher {
    pub fn new(
        client: Client,
        limiter: Arc<RateLimiter>,
        base_url: impl Into<String>,
        config: &CrawlerConfig,
    ) -> Self {
        Self {
            client,
            limiter,
            base_url: base_url.into(),
            page_size: config.page_size,
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }

    /// Builds the single episode standing in for a guest show
    pub fn guest_episode(&self, show_path: &str) -> Episode {
        let show_url = api_url(&self.base_url, show_path);
        Episode {
            name: Some(show_path.to_string()),
            links: vec![Link {
                rel: TRACKLIST_REL.to_string(),
                href: format!("{}/tracklist", show_url),
            }],
        }
    }

    /// Fetches every episode of the show at `show_path`, in page order
    ///
    /// The only termination condition is an empty page; an upstream that
    /// never returns one is not guarded against.
    pub async fn fetch_all_episodes(
        &self,
        show_path: &str,
        is_guest: bool,
    ) -> Result<Vec<Episode>, HarvestError> {
        if is_guest {
            tracing::debug!("Guest show {}, skipping episode pagination", show_path);
            return Ok(vec![self.guest_episode(show_path)]);
        }

        let show_url = api_url(&self.base_url, show_path);
        let mut episodes = Vec::new();
        let mut offset: u64 = 0;

        loop {
            self.limiter.acquire().await;

            let url = format!(
                "{}/episodes?offset={}&limit={}",
                show_url, offset, self.page_size
            );
            let page: EpisodePage = fetch_json(&self.client, &url).await?;

            if page.results.is_empty() {
                break;
            }

            tracing::debug!(
                "Fetched {} episodes of {} at offset {}",
                page.results.len(),
                show_path,
                offset
            );
            episodes.extend(page.results);
            offset += u64::from(self.page_size);

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(episodes)
    }
}
