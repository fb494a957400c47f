//! Runtime lifecycle.
//!
//! One background task per data source feeds the engine task through a
//! bounded event channel. The engine stops once every request it issued has
//! been answered, or when the shutdown signal fires; the fetch tasks then
//! finish whatever they had started and exit.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::application::engine::Engine;
use crate::application::fetch::{market_event, recipe_event, run_fetcher};
use crate::application::graph::CostGraph;
use crate::domain::{Market, RecipeId};
use crate::error::Result;
use crate::infrastructure::bootstrap::{ListingsCache, RecipeCache};
use crate::infrastructure::config::settings::Config;
use crate::port::NotifierRegistry;

/// Plain values the runtime needs from configuration.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub market: Market,
    pub seller_id: Option<String>,
    pub gather_cost: f64,
    pub channel_capacity: usize,
}

impl RuntimeSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            market: Market::new(config.market.market.clone()),
            seller_id: config.market.seller_id.clone(),
            gather_cost: config.engine.gather_cost,
            channel_capacity: config.engine.channel_capacity,
        }
    }
}

/// Caches, notifiers and settings for one engine run.
pub struct Runtime {
    listings: Arc<ListingsCache>,
    recipes: Arc<RecipeCache>,
    notifiers: Arc<NotifierRegistry>,
    settings: RuntimeSettings,
}

impl Runtime {
    #[must_use]
    pub fn new(
        listings: Arc<ListingsCache>,
        recipes: Arc<RecipeCache>,
        notifiers: Arc<NotifierRegistry>,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            listings,
            recipes,
            notifiers,
            settings,
        }
    }

    #[must_use]
    pub fn listings(&self) -> &Arc<ListingsCache> {
        &self.listings
    }

    /// Run until all requests are answered.
    pub async fn run(&self, recipe_ids: &[RecipeId]) -> CostGraph {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.run_with_shutdown(recipe_ids, shutdown_rx).await
    }

    /// Run with an externally controlled shutdown signal.
    pub async fn run_with_shutdown(
        &self,
        recipe_ids: &[RecipeId],
        shutdown: watch::Receiver<bool>,
    ) -> CostGraph {
        info!(recipes = recipe_ids.len(), market = %self.settings.market, "Starting engine");

        let (event_tx, event_rx) = mpsc::channel(self.settings.channel_capacity.max(1));
        let (market_tx, market_rx) = mpsc::unbounded_channel();
        let (recipe_tx, recipe_rx) = mpsc::unbounded_channel();

        let market_handle = tokio::spawn(run_fetcher(
            "market",
            Arc::clone(&self.listings),
            market_rx,
            event_tx.clone(),
            shutdown.clone(),
            market_event,
        ));
        let recipe_handle = tokio::spawn(run_fetcher(
            "recipe",
            Arc::clone(&self.recipes),
            recipe_rx,
            event_tx,
            shutdown.clone(),
            recipe_event,
        ));

        let mut engine = Engine::new(
            CostGraph::new(self.settings.gather_cost),
            self.settings.market.clone(),
            self.settings.seller_id.clone(),
            Arc::clone(&self.notifiers),
            market_tx,
            recipe_tx,
        );
        for &recipe_id in recipe_ids {
            engine.request_recipe(recipe_id);
        }

        // Dropping the engine closes the request queues.
        let graph = engine.run(event_rx, shutdown).await;

        for (source, handle) in [("market", market_handle), ("recipe", recipe_handle)] {
            if let Err(e) = handle.await {
                warn!(source, error = %e, "Fetcher task panicked");
            }
        }
        graph
    }

    /// Persist the listings cache.
    ///
    /// # Errors
    ///
    /// Returns the cache's save error; the run's results are unaffected.
    pub fn save(&self) -> Result<usize> {
        self.listings.save()
    }
}
