//! Crafting cost graph: acquisition resolution and change propagation.
//!
//! The graph owns one [`ItemCostState`] per item it has seen, the recipes
//! discovered so far, and the [`RecipeIndex`] linking them. Writes
//! (`record_recipe`, `update_market_data`) only mark items dirty in the
//! [`RecomputeScheduler`]; costs are brought up to date by [`CostGraph::drain`].

mod breakdown;
mod index;
mod propagate;
mod summary;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::scheduler::RecomputeScheduler;
use crate::domain::{
    AcquireAction, Item, ItemCostState, ItemId, MarketSnapshot, Recipe, RecipeId,
};
use crate::error::{EngineError, Result};

pub use breakdown::BreakdownNode;
pub use index::RecipeIndex;
pub use propagate::BatchReport;

/// Per-item cost state plus recipe adjacency.
pub struct CostGraph {
    gather_cost: f64,
    items: HashMap<ItemId, Item>,
    states: HashMap<ItemId, ItemCostState>,
    recipes: HashMap<RecipeId, Recipe>,
    index: RecipeIndex,
    scheduler: Arc<RecomputeScheduler>,
}

impl CostGraph {
    /// Create an empty graph with its own scheduler.
    ///
    /// `gather_cost` is the fallback acquire cost for items that can be
    /// neither bought nor crafted.
    #[must_use]
    pub fn new(gather_cost: f64) -> Self {
        Self::with_scheduler(gather_cost, Arc::new(RecomputeScheduler::new()))
    }

    /// Create an empty graph fed by a shared scheduler.
    #[must_use]
    pub fn with_scheduler(gather_cost: f64, scheduler: Arc<RecomputeScheduler>) -> Self {
        Self {
            gather_cost,
            items: HashMap::new(),
            states: HashMap::new(),
            recipes: HashMap::new(),
            index: RecipeIndex::new(),
            scheduler,
        }
    }

    /// Handle for enqueueing recomputation from other execution contexts.
    #[must_use]
    pub fn scheduler(&self) -> Arc<RecomputeScheduler> {
        Arc::clone(&self.scheduler)
    }

    #[must_use]
    pub const fn gather_cost(&self) -> f64 {
        self.gather_cost
    }

    /// Register a recipe and schedule its result item for recomputation.
    ///
    /// Recording a recipe id again replaces the previous definition.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the recipe fails validation.
    pub fn record_recipe(&mut self, recipe: Recipe) -> Result<()> {
        recipe.validate()?;

        self.ensure_item(recipe.result());
        for slot in recipe.ingredients() {
            self.ensure_item(&slot.item);
        }

        if let Some(previous) = self.recipes.get(&recipe.id()) {
            self.index.remove(previous);
        }
        self.index.insert(&recipe);

        let result_id = recipe.result().id;
        debug!(
            recipe_id = %recipe.id(),
            item_id = %result_id,
            ingredients = recipe.ingredients().len(),
            "Recipe recorded"
        );
        self.recipes.insert(recipe.id(), recipe);
        self.scheduler.enqueue(result_id);
        Ok(())
    }

    /// Overwrite an item's market cost and revenue and schedule it.
    ///
    /// Unknown items are created on first reference.
    pub fn update_market_data(
        &mut self,
        item_id: ItemId,
        market_cost: Option<f64>,
        revenue: Option<f64>,
    ) {
        let state = self.state_entry(item_id);
        state.market_cost = market_cost;
        state.revenue = revenue;
        self.scheduler.enqueue(item_id);
    }

    /// Apply every figure derived from a listings payload.
    pub fn apply_market_snapshot(&mut self, item_id: ItemId, snapshot: &MarketSnapshot) {
        let state = self.state_entry(item_id);
        state.velocity = snapshot.velocity;
        state.listing_count = Some(snapshot.listing_count);
        self.update_market_data(item_id, snapshot.market_cost, snapshot.revenue);
    }

    /// Process everything pending in the scheduler.
    pub fn drain(&mut self) -> BatchReport {
        let scheduler = Arc::clone(&self.scheduler);
        scheduler.drain(self)
    }

    /// Decide the cheapest acquire action from the current state.
    ///
    /// Buy and Craft compete on cost (Craft wins ties); Gather at the
    /// configured cost applies only when neither has a finite cost.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ItemNotFound`] for an unknown item.
    pub fn resolve_acquire_action(&self, item_id: ItemId) -> Result<AcquireAction> {
        let state = self.state(item_id)?;
        let crafting = self.best_recipe(item_id);
        Ok(self.decide(state.market_cost, crafting))
    }

    /// Cost of crafting one unit via `recipe_id` from current ingredient costs.
    ///
    /// `None` when an ingredient has no resolved cost; `inf` when one is
    /// unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RecipeNotFound`] for an unknown recipe.
    pub fn recipe_cost(&self, recipe_id: RecipeId) -> Result<Option<f64>> {
        let recipe = self.recipe(recipe_id)?;
        Ok(self.cost_of(recipe))
    }

    /// Profit of the item a recipe produces.
    #[doc(alias = "profit")]
    pub fn get_profit(&self, recipe_id: RecipeId) -> Result<Option<f64>> {
        let recipe = self.recipe(recipe_id)?;
        Ok(self.state(recipe.result().id)?.profit)
    }

    pub fn get_revenue(&self, item_id: ItemId) -> Result<Option<f64>> {
        Ok(self.state(item_id)?.revenue)
    }

    pub fn get_crafting_cost(&self, item_id: ItemId) -> Result<Option<f64>> {
        Ok(self.state(item_id)?.crafting_cost)
    }

    pub fn get_market_cost(&self, item_id: ItemId) -> Result<Option<f64>> {
        Ok(self.state(item_id)?.market_cost)
    }

    #[doc(alias = "get_aquire_action")]
    pub fn get_acquire_action(&self, item_id: ItemId) -> Result<AcquireAction> {
        Ok(self.state(item_id)?.acquire_action)
    }

    /// Full cost state of an item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ItemNotFound`] for an unknown item.
    pub fn state(&self, item_id: ItemId) -> Result<&ItemCostState> {
        self.states
            .get(&item_id)
            .ok_or_else(|| EngineError::ItemNotFound(item_id).into())
    }

    /// # Errors
    ///
    /// Returns [`EngineError::RecipeNotFound`] for an unknown recipe.
    pub fn recipe(&self, recipe_id: RecipeId) -> Result<&Recipe> {
        self.recipes
            .get(&recipe_id)
            .ok_or_else(|| EngineError::RecipeNotFound(recipe_id).into())
    }

    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.get(&item_id)
    }

    #[must_use]
    pub fn contains_recipe(&self, recipe_id: RecipeId) -> bool {
        self.recipes.contains_key(&recipe_id)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    #[must_use]
    pub const fn index(&self) -> &RecipeIndex {
        &self.index
    }

    /// Number of items with cost state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn ensure_item(&mut self, item: &Item) {
        self.items
            .entry(item.id)
            .or_insert_with(|| item.clone());
        self.state_entry(item.id);
    }

    fn state_entry(&mut self, item_id: ItemId) -> &mut ItemCostState {
        let gather_cost = self.gather_cost;
        self.states
            .entry(item_id)
            .or_insert_with(|| ItemCostState::new(gather_cost))
    }

    fn cost_of(&self, recipe: &Recipe) -> Option<f64> {
        let mut total = 0.0;
        for slot in recipe.ingredients() {
            let cost = self.states.get(&slot.item.id)?.acquire_cost();
            total += cost * f64::from(slot.quantity);
        }
        Some(total)
    }

    /// Cheapest resolvable recipe producing `item_id`.
    fn best_recipe(&self, item_id: ItemId) -> Option<(f64, RecipeId)> {
        let mut best: Option<(f64, RecipeId)> = None;
        for recipe_id in self.index.producers(item_id) {
            let Some(recipe) = self.recipes.get(&recipe_id) else {
                continue;
            };
            let Some(cost) = self.cost_of(recipe) else {
                continue;
            };
            if best.map_or(true, |(best_cost, _)| cost < best_cost) {
                best = Some((cost, recipe_id));
            }
        }
        best
    }

    fn decide(&self, market_cost: Option<f64>, crafting: Option<(f64, RecipeId)>) -> AcquireAction {
        let buy = market_cost
            .filter(|cost| cost.is_finite())
            .map(|cost| AcquireAction::Buy { cost });
        let craft = crafting
            .filter(|(cost, _)| cost.is_finite())
            .map(|(cost, via)| AcquireAction::Craft { cost, via });

        match (buy, craft) {
            (Some(buy), Some(craft)) => buy.cheaper(craft),
            (Some(action), None) | (None, Some(action)) => action,
            (None, None) => AcquireAction::Gather {
                cost: self.gather_cost,
            },
        }
    }

    /// Recompute one item; returns true when any cost figure changed.
    fn recompute(&mut self, item_id: ItemId) -> bool {
        let crafting = self.best_recipe(item_id);
        let Some(market_cost) = self.states.get(&item_id).map(|s| s.market_cost) else {
            return false;
        };
        let action = self.decide(market_cost, crafting);
        let crafting_cost = crafting.map(|(cost, _)| cost);

        let state = self.state_entry(item_id);
        let profit = state.revenue.map(|revenue| revenue - action.cost());
        let changed = state.crafting_cost != crafting_cost
            || state.acquire_action != action
            || state.profit != profit;

        state.crafting_cost = crafting_cost;
        state.acquire_action = action;
        state.profit = profit;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IngredientSlot;
    use crate::error::Error;

    fn item(id: u32) -> Item {
        Item::new(ItemId::new(id), format!("item-{id}"))
    }

    fn recipe(id: u32, result: u32, ingredients: &[(u32, u32)]) -> Recipe {
        Recipe::try_new(
            RecipeId::new(id),
            item(result),
            ingredients
                .iter()
                .map(|&(i, q)| IngredientSlot::new(item(i), q))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let graph = CostGraph::new(f64::INFINITY);
        let err = graph.get_market_cost(ItemId::new(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::Engine(EngineError::ItemNotFound(id)) if id == ItemId::new(1)
        ));
    }

    #[test]
    fn test_unknown_recipe_is_not_found() {
        let graph = CostGraph::new(f64::INFINITY);
        assert!(matches!(
            graph.get_profit(RecipeId::new(9)),
            Err(Error::Engine(EngineError::RecipeNotFound(_)))
        ));
    }

    #[test]
    fn test_item_without_data_gathers_at_fallback_cost() {
        let mut graph = CostGraph::new(25.0);
        graph.update_market_data(ItemId::new(1), None, None);
        graph.drain();
        assert_eq!(
            graph.resolve_acquire_action(ItemId::new(1)).unwrap(),
            AcquireAction::Gather { cost: 25.0 }
        );
    }

    #[test]
    fn test_recipe_cost_sums_quantities() {
        let mut graph = CostGraph::new(f64::INFINITY);
        graph
            .record_recipe(recipe(1, 10, &[(20, 2), (30, 1)]))
            .unwrap();
        graph.update_market_data(ItemId::new(20), Some(100.0), None);
        graph.update_market_data(ItemId::new(30), Some(50.0), None);
        graph.drain();

        assert_eq!(graph.recipe_cost(RecipeId::new(1)).unwrap(), Some(250.0));
    }

    #[test]
    fn test_recipe_with_unreachable_ingredient_costs_infinity() {
        let mut graph = CostGraph::new(f64::INFINITY);
        graph
            .record_recipe(recipe(1, 10, &[(20, 1), (30, 1)]))
            .unwrap();
        graph.update_market_data(ItemId::new(20), Some(100.0), None);
        graph.drain();

        assert_eq!(
            graph.get_crafting_cost(ItemId::new(10)).unwrap(),
            Some(f64::INFINITY)
        );
        assert_eq!(
            graph.get_acquire_action(ItemId::new(10)).unwrap(),
            AcquireAction::Gather {
                cost: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_market_only_item_is_bought() {
        let mut graph = CostGraph::new(f64::INFINITY);
        graph.update_market_data(ItemId::new(5), Some(42.0), Some(60.0));
        graph.drain();

        let state = graph.state(ItemId::new(5)).unwrap();
        assert_eq!(state.acquire_action, AcquireAction::Buy { cost: 42.0 });
        assert_eq!(state.profit, Some(18.0));
        assert_eq!(state.crafting_cost, None);
    }

    #[test]
    fn test_rerecording_recipe_replaces_ingredients() {
        let mut graph = CostGraph::new(f64::INFINITY);
        graph.record_recipe(recipe(1, 10, &[(20, 1)])).unwrap();
        graph.record_recipe(recipe(1, 10, &[(30, 1)])).unwrap();

        assert_eq!(graph.index().consumers(ItemId::new(20)).count(), 0);
        assert_eq!(graph.index().consumers(ItemId::new(30)).count(), 1);
    }
}
