//! Bidirectional item/recipe adjacency, built as recipes are discovered.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{ItemId, Recipe, RecipeId};

/// `item -> recipes producing it` and `item -> recipes consuming it`.
#[derive(Debug, Default)]
pub struct RecipeIndex {
    produced_by: HashMap<ItemId, BTreeSet<RecipeId>>,
    consumed_by: HashMap<ItemId, BTreeSet<RecipeId>>,
}

impl RecipeIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a recipe's result and ingredients. Re-indexing is a no-op.
    pub fn insert(&mut self, recipe: &Recipe) {
        self.produced_by
            .entry(recipe.result().id)
            .or_default()
            .insert(recipe.id());
        for slot in recipe.ingredients() {
            self.consumed_by
                .entry(slot.item.id)
                .or_default()
                .insert(recipe.id());
        }
    }

    /// Drop the edges of a previously indexed recipe.
    pub fn remove(&mut self, recipe: &Recipe) {
        if let Some(set) = self.produced_by.get_mut(&recipe.result().id) {
            set.remove(&recipe.id());
        }
        for slot in recipe.ingredients() {
            if let Some(set) = self.consumed_by.get_mut(&slot.item.id) {
                set.remove(&recipe.id());
            }
        }
    }

    /// Recipes whose result is `item_id`.
    pub fn producers(&self, item_id: ItemId) -> impl Iterator<Item = RecipeId> + '_ {
        self.produced_by
            .get(&item_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Recipes that use `item_id` as an ingredient.
    pub fn consumers(&self, item_id: ItemId) -> impl Iterator<Item = RecipeId> + '_ {
        self.consumed_by
            .get(&item_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    #[must_use]
    pub fn has_producers(&self, item_id: ItemId) -> bool {
        self.produced_by
            .get(&item_id)
            .is_some_and(|set| !set.is_empty())
    }
}
