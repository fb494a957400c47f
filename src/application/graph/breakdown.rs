//! Ingredient breakdown of a recipe.
//!
//! Descends into the recipe each `Craft` action points at. The walk is
//! bounded by depth and never re-enters a recipe already on the current
//! path, so self-referencing recipe chains print once.

use std::collections::HashSet;

use tracing::debug;

use super::CostGraph;
use crate::domain::{AcquireAction, ItemId, Recipe, RecipeId};
use crate::error::Result;

/// One row of an ingredient breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownNode {
    pub item_id: ItemId,
    pub name: String,
    pub action: AcquireAction,
    /// Units needed by the parent recipe; `None` for the root.
    pub quantity: Option<u32>,
    pub profit: Option<f64>,
    pub crafting_cost: Option<f64>,
    pub market_cost: Option<f64>,
    pub children: Vec<BreakdownNode>,
}

impl BreakdownNode {
    /// Depth-first rows with their depth, root at depth 0.
    #[must_use]
    pub fn rows(&self) -> Vec<(usize, &Self)> {
        let mut out = Vec::new();
        self.collect_rows(0, &mut out);
        out
    }

    fn collect_rows<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Self)>) {
        out.push((depth, self));
        for child in &self.children {
            child.collect_rows(depth + 1, out);
        }
    }

    /// Deepest level below this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl CostGraph {
    /// Ingredient tree for `recipe_id`, at most `max_depth` levels deep.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the recipe is unknown.
    pub fn breakdown(&self, recipe_id: RecipeId, max_depth: usize) -> Result<BreakdownNode> {
        let recipe = self.recipe(recipe_id)?;
        let mut root = self.breakdown_node(recipe.result().id, None)?;
        let mut path = HashSet::from([recipe_id]);
        root.children = self.expand(recipe, 1, max_depth, &mut path);
        Ok(root)
    }

    fn expand(
        &self,
        recipe: &Recipe,
        depth: usize,
        max_depth: usize,
        path: &mut HashSet<RecipeId>,
    ) -> Vec<BreakdownNode> {
        if depth > max_depth {
            return Vec::new();
        }
        let mut children = Vec::with_capacity(recipe.ingredients().len());
        for slot in recipe.ingredients() {
            let Ok(mut node) = self.breakdown_node(slot.item.id, Some(slot.quantity)) else {
                continue;
            };
            if let Some(via) = node.action.via_recipe() {
                match self.recipes.get(&via) {
                    Some(sub) if path.insert(via) => {
                        node.children = self.expand(sub, depth + 1, max_depth, path);
                        path.remove(&via);
                    }
                    Some(_) => {
                        debug!(recipe_id = %via, "Breakdown stopped at recipe already on path");
                    }
                    None => {}
                }
            }
            children.push(node);
        }
        children
    }

    fn breakdown_node(&self, item_id: ItemId, quantity: Option<u32>) -> Result<BreakdownNode> {
        let state = self.state(item_id)?;
        let name = self
            .item(item_id)
            .map_or_else(|| item_id.to_string(), |item| item.name.clone());
        Ok(BreakdownNode {
            item_id,
            name,
            action: state.acquire_action,
            quantity,
            profit: state.profit,
            crafting_cost: state.crafting_cost,
            market_cost: state.market_cost,
            children: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::application::graph::CostGraph;
    use crate::domain::{IngredientSlot, Item, ItemId, Recipe, RecipeId};

    fn recipe(id: u32, result: u32, ingredients: &[(u32, u32)]) -> Recipe {
        Recipe::try_new(
            RecipeId::new(id),
            Item::new(ItemId::new(result), format!("item-{result}")),
            ingredients
                .iter()
                .map(|&(i, q)| IngredientSlot::new(Item::new(ItemId::new(i), format!("item-{i}")), q))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_breakdown_descends_into_crafted_ingredients() {
        // 10 <- 2x20 + 1x30; 20 <- 1x40.
        let mut graph = CostGraph::new(f64::INFINITY);
        graph.record_recipe(recipe(1, 10, &[(20, 2), (30, 1)])).unwrap();
        graph.record_recipe(recipe(2, 20, &[(40, 1)])).unwrap();
        graph.update_market_data(ItemId::new(20), Some(100.0), None);
        graph.update_market_data(ItemId::new(30), Some(50.0), None);
        graph.update_market_data(ItemId::new(40), Some(30.0), None);
        graph.drain();

        let tree = graph.breakdown(RecipeId::new(1), 8).unwrap();
        assert_eq!(tree.name, "item-10");
        assert_eq!(tree.quantity, None);
        assert_eq!(tree.children.len(), 2);

        let crafted = &tree.children[0];
        assert_eq!(crafted.quantity, Some(2));
        assert_eq!(crafted.action.via_recipe(), Some(RecipeId::new(2)));
        assert_eq!(crafted.children.len(), 1);
        assert_eq!(crafted.children[0].item_id, ItemId::new(40));

        assert!(tree.children[1].children.is_empty());
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.rows().len(), 4);
    }

    #[test]
    fn test_breakdown_respects_max_depth() {
        let mut graph = CostGraph::new(f64::INFINITY);
        graph.record_recipe(recipe(1, 10, &[(20, 1)])).unwrap();
        graph.record_recipe(recipe(2, 20, &[(30, 1)])).unwrap();
        graph.update_market_data(ItemId::new(30), Some(1.0), None);
        graph.drain();

        assert_eq!(graph.breakdown(RecipeId::new(1), 0).unwrap().depth(), 0);
        assert_eq!(graph.breakdown(RecipeId::new(1), 1).unwrap().depth(), 1);
        assert_eq!(graph.breakdown(RecipeId::new(1), 8).unwrap().depth(), 2);
    }

    #[test]
    fn test_breakdown_terminates_on_cycle() {
        let mut graph = CostGraph::new(f64::INFINITY);
        graph.record_recipe(recipe(1, 10, &[(20, 1)])).unwrap();
        graph.record_recipe(recipe(2, 20, &[(10, 1)])).unwrap();
        graph.update_market_data(ItemId::new(10), Some(7.0), None);
        graph.drain();

        let tree = graph.breakdown(RecipeId::new(2), 50).unwrap();
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_breakdown_unknown_recipe() {
        let graph = CostGraph::new(f64::INFINITY);
        assert!(graph.breakdown(RecipeId::new(1), 3).is_err());
    }
}
