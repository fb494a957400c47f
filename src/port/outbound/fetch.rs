//! Data source ports for the persistent cache.
//!
//! A [`Fetcher`] turns a key into a freshly fetched value. The cache wraps
//! one fetcher per data kind: market listings keyed by item and market,
//! recipe reference data keyed by recipe id.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ItemMarketKey, Listings, Recipe, RecipeId};
use crate::error::Result;

/// Fetch the current value for a key from an external source.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Errors are never cached; the next `get` for the key fetches again
#[async_trait]
pub trait Fetcher<K, V>: Send + Sync {
    /// Fetch the value for `key`.
    async fn fetch(&self, key: &K) -> Result<V>;
}

#[async_trait]
impl<K, V, T> Fetcher<K, V> for Arc<T>
where
    K: Sync,
    V: 'static,
    T: Fetcher<K, V> + ?Sized,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        (**self).fetch(key).await
    }
}

/// Market listings source.
pub trait ListingsFetcher: Fetcher<ItemMarketKey, Listings> {}

impl<T: Fetcher<ItemMarketKey, Listings> + ?Sized> ListingsFetcher for T {}

/// Recipe reference data source.
pub trait RecipeSource: Fetcher<RecipeId, Recipe> {}

impl<T: Fetcher<RecipeId, Recipe> + ?Sized> RecipeSource for T {}

/// [`Fetcher`] backed by an async closure.
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap an async closure taking an owned key as a [`Fetcher`].
pub fn from_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

#[async_trait]
impl<K, V, F, Fut> Fetcher<K, V> for FnFetcher<F>
where
    K: Clone + Send + Sync + 'static,
    V: Send + 'static,
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V>> + Send + 'static,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        (self.f)(key.clone()).await
    }
}
