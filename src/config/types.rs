use serde::Deserialize;

/// Main configuration structure for a harvest run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Upstream API location
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every show path is appended to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Credits whose path starts with this prefix are guest shows
    #[serde(rename = "guest-path-prefix", default = "default_guest_path_prefix")]
    pub guest_path_prefix: String,
}

/// Throttling and pagination behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Token refill rate of the shared request bucket
    #[serde(rename = "requests-per-second", default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Bucket capacity; defaults to `requests-per-second`
    #[serde(default)]
    pub burst: Option<u32>,

    /// Number of episodes requested per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Courtesy delay between episode pages (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl CrawlerConfig {
    /// Effective bucket capacity
    pub fn burst(&self) -> u32 {
        self.burst.unwrap_or(self.requests_per_second)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: None,
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,

    /// URL or email where the operator can be reached
    #[serde(default)]
    pub contact: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        match &self.contact {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
            contact: None,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the JSON catalog of mixtapes and their show credits
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one subdirectory per mixtape
    pub root: String,

    /// Path to the JSON checkpoint file
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,
}

fn default_guest_path_prefix() -> String {
    "/guests/".to_string()
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_page_size() -> u32 {
    12
}

fn default_page_delay_ms() -> u64 {
    200
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
