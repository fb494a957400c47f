//! Market board client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Settings for the `[market]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// REST API base URL, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// World, data center or region the listings are fetched for.
    #[serde(default = "default_market")]
    pub market: String,
    /// Minimum gap between two requests (milliseconds).
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Attempts per request before giving up.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Fixed backoff between attempts (milliseconds).
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Own seller id; its listings never set the market cost.
    #[serde(default)]
    pub seller_id: Option<String>,
}

fn default_base_url() -> String {
    "https://universalis.app/api/v2".into()
}

fn default_market() -> String {
    "55".into()
}

const fn default_min_interval_ms() -> u64 {
    50
}

const fn default_retry_max_attempts() -> u32 {
    10
}

const fn default_retry_backoff_ms() -> u64 {
    50
}

const fn default_timeout_ms() -> u64 {
    15_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl MarketConfig {
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            market: default_market(),
            min_interval_ms: default_min_interval_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            seller_id: None,
        }
    }
}
