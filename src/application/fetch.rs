//! Background fetch tasks, one per data source.
//!
//! A fetcher takes keys from its request queue, resolves each through its
//! [`PersistentCache`] on a separate task, and forwards the outcome to the
//! engine as an [`EngineEvent`]. On shutdown it stops taking requests and
//! waits for fetches already started so no cache write is abandoned.

use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::cache::PersistentCache;
use crate::application::engine::EngineEvent;
use crate::domain::{ItemMarketKey, Listings, Recipe, RecipeId};
use crate::error::Result;

/// Converts a fetch outcome into the engine's event.
pub type ToEvent<K, V> = fn(K, Result<V>) -> EngineEvent;

/// Event for a listings fetch.
#[must_use]
pub fn market_event(key: ItemMarketKey, result: Result<Listings>) -> EngineEvent {
    match result {
        Ok(listings) => EngineEvent::MarketDataReceived { key, listings },
        Err(e) => EngineEvent::MarketDataFailed {
            key,
            reason: e.to_string(),
        },
    }
}

/// Event for a recipe fetch.
#[must_use]
pub fn recipe_event(recipe_id: RecipeId, result: Result<Recipe>) -> EngineEvent {
    match result {
        Ok(recipe) => EngineEvent::RecipeDiscovered(recipe),
        Err(e) => EngineEvent::RecipeFailed {
            recipe_id,
            reason: e.to_string(),
        },
    }
}

/// Serve fetch requests until the queue closes or shutdown is signalled.
pub async fn run_fetcher<K, V>(
    source: &'static str,
    cache: Arc<PersistentCache<K, V>>,
    mut requests: mpsc::UnboundedReceiver<K>,
    events: mpsc::Sender<EngineEvent>,
    mut shutdown: watch::Receiver<bool>,
    to_event: ToEvent<K, V>,
) where
    K: Eq + Hash + Clone + Send + Sync + Display + 'static,
    V: Clone + Send + Sync + 'static,
{
    let mut tasks = JoinSet::new();
    let mut started = 0usize;

    if !*shutdown.borrow() {
        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!(source, "Fetcher stopping on shutdown");
                        break;
                    }
                }
                request = requests.recv() => {
                    let Some(key) = request else {
                        debug!(source, "Request queue closed");
                        break;
                    };
                    started += 1;
                    let cache = Arc::clone(&cache);
                    let events = events.clone();
                    tasks.spawn(async move {
                        let result = cache.get(&key).await;
                        // The engine may already be gone after shutdown.
                        let _ = events.send(to_event(key, result)).await;
                    });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        warn!(source, error = %e, "Fetch task failed");
                    }
                }
            }
        }
    }

    let in_flight = tasks.len();
    if in_flight > 0 {
        debug!(source, in_flight, "Waiting for in-flight fetches");
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(source, error = %e, "Fetch task failed");
        }
    }
    debug!(source, started, "Fetcher finished");
}
