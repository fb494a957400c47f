//! Infrastructure bootstrap helpers for runtime wiring.
//!
//! Every shared object (rate limiter, caches, notifiers) is built here and
//! injected; nothing is process-global.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::adapter::outbound::catalog::CatalogRecipeSource;
use crate::adapter::outbound::universalis::MarketDataClient;
use crate::application::cache::PersistentCache;
use crate::domain::{ItemMarketKey, Listings, Recipe, RecipeId};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::runtime::{Runtime, RuntimeSettings};
use crate::port::{ListingsFetcher, LogNotifier, NotifierRegistry, RecipeSource};

/// Recipe data does not go stale within a run.
const RECIPE_TTL_WEEKS: i64 = 52;

pub type ListingsCache = PersistentCache<ItemMarketKey, Listings>;
pub type RecipeCache = PersistentCache<RecipeId, Recipe>;

/// Build notifier registry with the log notifier registered.
#[must_use]
pub fn build_notifier_registry() -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    registry
}

#[must_use]
pub fn build_rate_limiter(config: &Config) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(config.market.min_interval()))
}

#[must_use]
pub fn build_market_client(config: &Config, limiter: Arc<RateLimiter>) -> Arc<MarketDataClient> {
    Arc::new(MarketDataClient::from_config(&config.market, limiter))
}

/// Listings cache backed by the configured snapshot file.
#[must_use]
pub fn build_listings_cache<F: ListingsFetcher + 'static>(
    config: &Config,
    fetcher: Arc<F>,
) -> Arc<ListingsCache> {
    Arc::new(PersistentCache::open(
        fetcher,
        config.cache.ttl(),
        &config.cache.path,
    ))
}

/// In-memory recipe cache over the configured catalog file.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn build_recipe_cache(config: &Config) -> Result<Arc<RecipeCache>> {
    let source = CatalogRecipeSource::load(&config.recipes.catalog)?;
    Ok(recipe_cache(source))
}

/// In-memory recipe cache over any recipe source.
#[must_use]
pub fn recipe_cache<S: RecipeSource + 'static>(source: S) -> Arc<RecipeCache> {
    Arc::new(PersistentCache::in_memory(
        Arc::new(source),
        Duration::weeks(RECIPE_TTL_WEEKS),
    ))
}

/// Wire the full runtime from configuration.
///
/// # Errors
///
/// Returns an error if the recipe catalog cannot be loaded.
pub fn build_runtime(config: &Config) -> Result<Runtime> {
    let limiter = build_rate_limiter(config);
    let client = build_market_client(config, limiter);
    let listings = build_listings_cache(config, client);
    let recipes = build_recipe_cache(config)?;
    let notifiers = Arc::new(build_notifier_registry());
    info!(
        market = %config.market.market,
        cache = %config.cache.path.display(),
        notifiers = notifiers.len(),
        "Runtime wired"
    );
    Ok(Runtime::new(
        listings,
        recipes,
        notifiers,
        RuntimeSettings::from_config(config),
    ))
}
