//! Market board REST client.
//!
//! One request per `(market, item)`: `GET {base_url}/{market}/{item_id}`.
//! Every attempt first takes a permit from the shared [`RateLimiter`].
//! Transport failures and non-2xx responses are retried after a fixed
//! backoff until the attempt budget is spent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::settings::MarketConfig;
use crate::domain::{ItemMarketKey, Listings};
use crate::error::{MarketError, Result};
use crate::infrastructure::rate_limit::RateLimiter;
use crate::port::Fetcher;

/// HTTP client for per-item market listings.
pub struct MarketDataClient {
    http: HttpClient,
    base_url: String,
    limiter: Arc<RateLimiter>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl MarketDataClient {
    /// Client with default HTTP settings and a single attempt per request.
    #[must_use]
    pub fn new(base_url: impl Into<String>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &MarketConfig, limiter: Arc<RateLimiter>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter,
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry(mut self, max_attempts: u32, backoff_ms: u64) -> Self {
        self.retry_max_attempts = max_attempts;
        self.retry_backoff_ms = backoff_ms;
        self
    }

    #[must_use]
    pub fn listings_url(&self, key: &ItemMarketKey) -> String {
        format!("{}/{}/{}", self.base_url, key.market, key.item_id)
    }

    /// Fetch current listings for one item in one market.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::RetriesExhausted`] once every attempt failed,
    /// a JSON error for a malformed payload, and
    /// [`MarketError::ItemMismatch`] if the payload describes another item.
    pub async fn fetch_listings(&self, key: &ItemMarketKey) -> Result<Listings> {
        let url = self.listings_url(key);
        let max_attempts = self.retry_max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.limiter.acquire().await;

            let failure = match self.http.get(&url).send().await {
                Ok(response) if response.status().is_success() => match response.bytes().await {
                    Ok(body) => return Self::parse(key, &body),
                    Err(err) => err.to_string(),
                },
                Ok(response) => response.status().to_string(),
                Err(err) => err.to_string(),
            };

            if attempt >= max_attempts {
                return Err(MarketError::RetriesExhausted {
                    url,
                    attempts: attempt,
                    status: failure,
                }
                .into());
            }
            self.backoff(attempt, max_attempts, &failure).await;
        }
    }

    fn parse(key: &ItemMarketKey, body: &[u8]) -> Result<Listings> {
        let listings: Listings = serde_json::from_slice(body)?;
        if listings.item_id != key.item_id {
            return Err(MarketError::ItemMismatch {
                expected: key.item_id,
                actual: listings.item_id,
            }
            .into());
        }
        debug!(
            key = %key,
            listings = listings.listings.len(),
            sales = listings.recent_history.len(),
            "Fetched listings"
        );
        Ok(listings)
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, failure: &str) {
        warn!(
            attempt,
            max_attempts,
            error = %failure,
            "Market request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

#[async_trait]
impl Fetcher<ItemMarketKey, Listings> for MarketDataClient {
    async fn fetch(&self, key: &ItemMarketKey) -> Result<Listings> {
        self.fetch_listings(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use crate::error::Error;

    fn client(base: &str) -> MarketDataClient {
        MarketDataClient::new(base, Arc::new(RateLimiter::new(Duration::ZERO)))
    }

    #[test]
    fn test_listings_url() {
        let key = ItemMarketKey::new(ItemId::new(5057), "Chaos");
        assert_eq!(
            client("https://example.test/api/v2/").listings_url(&key),
            "https://example.test/api/v2/Chaos/5057"
        );
    }

    #[test]
    fn test_parse_rejects_other_item() {
        let key = ItemMarketKey::new(ItemId::new(1), "55");
        let err = MarketDataClient::parse(&key, br#"{"itemID": 2}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Market(MarketError::ItemMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_universalis_payload() {
        let body = br#"{
            "itemID": 5057,
            "lastUploadTime": 1700000000000,
            "listings": [
                {"pricePerUnit": 120, "quantity": 3, "hq": false, "sellerID": "abc", "retainerName": "Shop"}
            ],
            "recentHistory": [
                {"pricePerUnit": 110, "quantity": 1, "hq": true, "timestamp": 1699999999}
            ],
            "minPrice": 120,
            "averagePrice": 115.5,
            "regularSaleVelocity": 4.25
        }"#;
        let key = ItemMarketKey::new(ItemId::new(5057), "55");
        let listings = MarketDataClient::parse(&key, body).unwrap();
        assert_eq!(listings.listings[0].price_per_unit, 120.0);
        assert_eq!(listings.listings[0].seller_id.as_deref(), Some("abc"));
        assert_eq!(listings.recent_history.len(), 1);
        assert_eq!(listings.regular_sale_velocity, 4.25);
    }
}
