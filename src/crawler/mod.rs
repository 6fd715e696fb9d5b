//! Crawler module for harvesting show tracklists
//!
//! This module contains the core crawling logic, including:
//! - The shared token-bucket rate limiter
//! - Paginated episode listing and tracklist retrieval
//! - The per-show pipeline (fetch, merge, persist, checkpoint)
//! - Overall crawl coordination

mod coordinator;
mod episodes;
mod fetcher;
mod pipeline;
mod rate_limit;
mod totals;
mod tracklist;

pub use coordinator::{run_crawl, CrawlDriver};
pub use episodes::{Episode, EpisodeFetcher, Link, TRACKLIST_REL};
pub use fetcher::{api_url, build_http_client, fetch_json};
pub use pipeline::{ShowOutcome, ShowPipeline};
pub use rate_limit::RateLimiter;
pub use totals::{CrawlSummary, CrawlTotals};
pub use tracklist::TracklistFetcher;
