//! Listings cache configuration.

use std::path::PathBuf;

use chrono::Duration;
use serde::Deserialize;

/// Settings for the `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Snapshot file for market listings.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Entry time-to-live in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_path() -> PathBuf {
    PathBuf::from(".data/listings.json")
}

const fn default_ttl_secs() -> u64 {
    3600 // 1 hour
}

impl CacheConfig {
    /// TTL as a signed duration, saturating at one hundred years.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        let secs = self.ttl_secs.min(MAX_TTL_SECS);
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }
}

const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 3600;

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            ttl_secs: default_ttl_secs(),
        }
    }
}
