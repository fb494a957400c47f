//! Recipe rows and change events derived from graph state.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::{BatchReport, CostGraph};
use crate::domain::{RecipeId, RecipeSummary};
use crate::error::Result;
use crate::port::outbound::notifier::CostEvent;

impl CostGraph {
    /// Summary row for one recipe.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the recipe or its result item is unknown.
    pub fn recipe_summary(&self, recipe_id: RecipeId) -> Result<RecipeSummary> {
        let recipe = self.recipe(recipe_id)?;
        let item = recipe.result();
        let state = self.state(item.id)?;
        Ok(RecipeSummary {
            recipe_id,
            item_id: item.id,
            item_name: item.name.clone(),
            job: recipe.job().cloned(),
            acquire_action: state.acquire_action,
            profit: state.profit,
            revenue: state.revenue,
            crafting_cost: state.crafting_cost,
            market_cost: state.market_cost,
            velocity: state.velocity,
            listing_count: state.listing_count,
        })
    }

    /// All recipe rows, best score first; rows without a score sort last.
    #[must_use]
    pub fn summaries(&self) -> Vec<RecipeSummary> {
        let mut rows: Vec<RecipeSummary> = self
            .recipes
            .keys()
            .filter_map(|id| self.recipe_summary(*id).ok())
            .collect();
        rows.sort_by(|a, b| match (a.score(), b.score()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.recipe_id.cmp(&b.recipe_id),
        });
        rows
    }

    /// Observer events for everything a batch touched.
    ///
    /// One `ItemChanged` per touched item, then one `RecipeChanged` per
    /// recipe producing a touched item.
    #[must_use]
    pub fn change_events(&self, report: &BatchReport) -> Vec<CostEvent> {
        let touched = report.touched();
        let mut events = Vec::new();
        let mut recipes = Vec::new();
        let mut seen = HashSet::new();

        for item_id in touched {
            let Ok(state) = self.state(item_id) else {
                continue;
            };
            events.push(CostEvent::ItemChanged {
                item_id,
                state: state.clone(),
            });
            for recipe_id in self.index.producers(item_id) {
                if seen.insert(recipe_id) {
                    recipes.push(recipe_id);
                }
            }
        }

        events.extend(
            recipes
                .into_iter()
                .filter_map(|id| self.recipe_summary(id).ok())
                .map(CostEvent::RecipeChanged),
        );
        events
    }
}

#[cfg(test)]
mod tests {
    use crate::application::graph::CostGraph;
    use crate::domain::{IngredientSlot, Item, ItemId, Recipe, RecipeId};
    use crate::port::outbound::notifier::CostEvent;

    fn graph_with_two_recipes() -> CostGraph {
        let mut graph = CostGraph::new(f64::INFINITY);
        for (recipe_id, result) in [(1, 10), (2, 20)] {
            let recipe = Recipe::try_new(
                RecipeId::new(recipe_id),
                Item::new(ItemId::new(result), format!("item-{result}")),
                vec![IngredientSlot::new(Item::new(ItemId::new(99), "shard"), 1)],
            )
            .unwrap();
            graph.record_recipe(recipe).unwrap();
        }
        graph.update_market_data(ItemId::new(99), Some(10.0), None);
        graph.update_market_data(ItemId::new(10), Some(50.0), Some(100.0));
        graph.update_market_data(ItemId::new(20), Some(50.0), Some(40.0));
        graph.drain();
        graph
    }

    #[test]
    fn test_summaries_sort_by_score() {
        let mut graph = graph_with_two_recipes();
        let snapshot = crate::domain::MarketSnapshot {
            market_cost: Some(50.0),
            revenue: Some(40.0),
            velocity: Some(10.0),
            listing_count: 2,
        };
        graph.apply_market_snapshot(ItemId::new(20), &snapshot);
        graph.apply_market_snapshot(
            ItemId::new(10),
            &crate::domain::MarketSnapshot {
                revenue: Some(100.0),
                velocity: Some(1.0),
                ..snapshot
            },
        );
        graph.drain();

        let rows = graph.summaries();
        // 10: profit 90 * velocity 1 = 90; 20: profit 30 * velocity 10 = 300.
        assert_eq!(rows[0].recipe_id, RecipeId::new(2));
        assert_eq!(rows[0].score(), Some(300.0));
        assert_eq!(rows[1].score(), Some(90.0));
    }

    #[test]
    fn test_change_events_cover_producing_recipes() {
        let mut graph = graph_with_two_recipes();
        graph.update_market_data(ItemId::new(99), Some(5.0), None);
        let report = graph.drain();
        let events = graph.change_events(&report);

        let recipe_ids: Vec<RecipeId> = events
            .iter()
            .filter_map(|event| match event {
                CostEvent::RecipeChanged(row) => Some(row.recipe_id),
                CostEvent::ItemChanged { .. } => None,
            })
            .collect();
        assert_eq!(recipe_ids, vec![RecipeId::new(1), RecipeId::new(2)]);

        let item_events = events
            .iter()
            .filter(|event| matches!(event, CostEvent::ItemChanged { .. }))
            .count();
        assert_eq!(item_events, 3);
    }
}
