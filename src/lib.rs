//! Tracklist Harvest: a resumable track-list crawler for radio show catalogs
//!
//! This crate walks a catalog of mixtapes and their shows, pages through each
//! show's episodes on a rate-limited upstream API, collects every episode's
//! tracklist and merges the deduplicated result into one JSON file per show.
//! A checkpoint file records finished shows so an interrupted crawl can be
//! re-run safely.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod dedup;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::ShowState,
        to: state::ShowState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Input catalog errors. Both are fatal for a run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Catalog, Mixtape, Show};
pub use config::Config;
pub use crawler::{CrawlSummary, CrawlTotals, ShowOutcome};
pub use dedup::{DedupStore, Fingerprint, Track};
pub use state::ShowState;
