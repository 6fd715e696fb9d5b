//! HTTP fetcher implementation
//!
//! This module handles the plumbing shared by the episode and tracklist
//! fetchers:
//! - Building the HTTP client with a descriptive user agent
//! - Joining show paths onto the API base URL
//! - GET + status check + JSON decoding with per-URL error context

use crate::config::UserAgentConfig;
use crate::HarvestError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use tracklist_harvest::config::UserAgentConfig;
/// use tracklist_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Appends an API path such as `/shows/foo` to the base URL
pub fn api_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_matches('/')
    )
}

/// Fetches `url` and decodes the body as JSON
///
/// # Errors
///
/// * `HarvestError::Http` - The request could not be sent or the body not read
/// * `HarvestError::Status` - The server answered with a non-2xx status
/// * `HarvestError::Decode` - The body is not the expected JSON document
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|source| HarvestError::Decode {
        url: url.to_string(),
        source,
    })
}
