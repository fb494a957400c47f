//! Single-writer engine task.
//!
//! The engine owns the [`CostGraph`]. Fetch results arrive as typed
//! [`EngineEvent`]s over one channel; each burst of events is applied, the
//! recompute queue drained once, and the resulting change events handed to
//! the notifiers. Discovering a recipe requests listings for every item it
//! touches plus the alternative recipes of its ingredients.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::application::graph::CostGraph;
use crate::domain::{ItemId, ItemMarketKey, Listings, Market, Recipe, RecipeId};
use crate::port::NotifierRegistry;

/// Results crossing from the fetch tasks into the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    MarketDataReceived {
        key: ItemMarketKey,
        listings: Listings,
    },
    MarketDataFailed {
        key: ItemMarketKey,
        reason: String,
    },
    RecipeDiscovered(Recipe),
    RecipeFailed {
        recipe_id: RecipeId,
        reason: String,
    },
}

/// Owner of the cost graph and the request bookkeeping.
pub struct Engine {
    graph: CostGraph,
    market: Market,
    own_seller: Option<String>,
    notifiers: Arc<NotifierRegistry>,
    market_requests: mpsc::UnboundedSender<ItemMarketKey>,
    recipe_requests: mpsc::UnboundedSender<RecipeId>,
    requested_items: HashSet<ItemId>,
    requested_recipes: HashSet<RecipeId>,
    outstanding: usize,
}

impl Engine {
    #[must_use]
    pub fn new(
        graph: CostGraph,
        market: Market,
        own_seller: Option<String>,
        notifiers: Arc<NotifierRegistry>,
        market_requests: mpsc::UnboundedSender<ItemMarketKey>,
        recipe_requests: mpsc::UnboundedSender<RecipeId>,
    ) -> Self {
        Self {
            graph,
            market,
            own_seller,
            notifiers,
            market_requests,
            recipe_requests,
            requested_items: HashSet::new(),
            requested_recipes: HashSet::new(),
            outstanding: 0,
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &CostGraph {
        &self.graph
    }

    /// Requests sent and not yet answered.
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Ask the recipe fetcher for a recipe, once per engine lifetime.
    pub fn request_recipe(&mut self, recipe_id: RecipeId) {
        if !self.requested_recipes.insert(recipe_id) {
            return;
        }
        if self.recipe_requests.send(recipe_id).is_ok() {
            self.outstanding += 1;
        } else {
            warn!(recipe_id = %recipe_id, "Recipe fetcher gone, request dropped");
        }
    }

    /// Ask the market fetcher for an item's listings, once per engine lifetime.
    pub fn request_listings(&mut self, item_id: ItemId) {
        if !self.requested_items.insert(item_id) {
            return;
        }
        let key = ItemMarketKey::new(item_id, self.market.clone());
        if self.market_requests.send(key).is_ok() {
            self.outstanding += 1;
        } else {
            warn!(item_id = %item_id, "Market fetcher gone, request dropped");
        }
    }

    /// Apply one event to the graph without draining.
    pub fn handle(&mut self, event: EngineEvent) {
        self.outstanding = self.outstanding.saturating_sub(1);
        match event {
            EngineEvent::MarketDataReceived { key, listings } => {
                let snapshot = listings.snapshot(self.own_seller.as_deref());
                debug!(
                    item_id = %key.item_id,
                    market_cost = ?snapshot.market_cost,
                    revenue = ?snapshot.revenue,
                    "Market data received"
                );
                self.graph.apply_market_snapshot(key.item_id, &snapshot);
            }
            EngineEvent::MarketDataFailed { key, reason } => {
                warn!(key = %key, reason = %reason, "Market data unavailable");
            }
            EngineEvent::RecipeDiscovered(recipe) => self.discover(recipe),
            EngineEvent::RecipeFailed { recipe_id, reason } => {
                warn!(recipe_id = %recipe_id, reason = %reason, "Recipe unavailable");
            }
        }
    }

    fn discover(&mut self, recipe: Recipe) {
        self.request_listings(recipe.result().id);
        let ingredients: Vec<ItemId> = recipe.ingredients().iter().map(|slot| slot.item.id).collect();
        for item_id in ingredients {
            self.request_listings(item_id);
        }
        let alternatives: Vec<RecipeId> = recipe.ingredient_recipes().collect();
        for recipe_id in alternatives {
            self.request_recipe(recipe_id);
        }

        let recipe_id = recipe.id();
        if let Err(e) = self.graph.record_recipe(recipe) {
            warn!(recipe_id = %recipe_id, error = %e, "Recipe rejected");
        }
    }

    /// Drain the recompute queue and notify observers of what changed.
    pub fn flush(&mut self) {
        let report = self.graph.drain();
        if report.is_empty() {
            return;
        }
        for event in self.graph.change_events(&report) {
            self.notifiers.notify_all(event);
        }
    }

    /// Process events until every request is answered or shutdown is
    /// signalled. Returns the graph.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<EngineEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> CostGraph {
        self.flush();
        while self.outstanding > 0 {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!(outstanding = self.outstanding, "Engine stopping on shutdown");
                        break;
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        warn!(outstanding = self.outstanding, "Event channel closed");
                        break;
                    };
                    self.handle(event);
                    while let Ok(event) = events.try_recv() {
                        self.handle(event);
                    }
                    self.flush();
                }
            }
        }
        self.flush();
        info!(
            items = self.graph.len(),
            recipes = self.graph.recipes().count(),
            "Engine finished"
        );
        self.graph
    }
}
