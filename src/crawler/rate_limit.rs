//! Token-bucket throttle shared by every outbound request
//!
//! Tokens refill continuously at `requests_per_second`; the bucket never holds
//! more than `burst` tokens. Acquisition waits as long as needed and never
//! fails.

use crate::config::CrawlerConfig;
use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;

/// Shared request throttle
pub struct RateLimiter {
    bucket: DefaultDirectRateLimiter,
    requests_per_second: NonZeroU32,
    burst: NonZeroU32,
}

impl RateLimiter {
    /// Creates a limiter refilling `requests_per_second` tokens per second with
    /// a capacity of `burst`. Zero values are raised to one.
    pub fn new(requests_per_second: u32, burst: u32) -> Self {
        let requests_per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);

        Self {
            bucket: governor::RateLimiter::direct(
                Quota::per_second(requests_per_second).allow_burst(burst),
            ),
            requests_per_second,
            burst,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.requests_per_second, config.burst())
    }

    /// Waits until a token is available and consumes it
    pub async fn acquire(&self) {
        self.bucket.until_ready().await;
    }

    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second.get()
    }

    pub fn burst(&self) -> u32 {
        self.burst.get()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_second", &self.requests_per_second)
            .field("burst", &self.burst)
            .finish()
    }
}
