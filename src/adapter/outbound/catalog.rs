//! Recipe reference data from a JSON catalog on disk.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{Recipe, RecipeId};
use crate::error::{EngineError, Result};
use crate::port::Fetcher;

/// Read-only recipe lookup loaded once from a catalog file.
///
/// The file holds a JSON array of recipes:
///
/// ```json
/// [{"id": 1, "result": {"id": 10, "name": "Bronze Ingot"},
///   "ingredients": [{"item": {"id": 20, "name": "Copper Ore"}, "quantity": 3}]}]
/// ```
#[derive(Debug, Default)]
pub struct CatalogRecipeSource {
    recipes: HashMap<RecipeId, Recipe>,
}

impl CatalogRecipeSource {
    /// Load and validate every recipe in the catalog file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, a JSON error if it
    /// does not parse, and a domain error for the first invalid recipe.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let recipes: Vec<Recipe> = serde_json::from_slice(&content)?;
        let source = Self::from_recipes(recipes)?;
        info!(path = %path.display(), recipes = source.len(), "Recipe catalog loaded");
        Ok(source)
    }

    /// Build a catalog from recipes in memory. A repeated id keeps the last.
    ///
    /// # Errors
    ///
    /// Returns a domain error for the first invalid recipe.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Result<Self> {
        let mut map = HashMap::new();
        for recipe in recipes {
            recipe.validate()?;
            if let Some(previous) = map.insert(recipe.id(), recipe) {
                warn!(recipe_id = %previous.id(), "Duplicate recipe in catalog, keeping the last");
            }
        }
        Ok(Self { recipes: map })
    }

    #[must_use]
    pub fn get(&self, recipe_id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(&recipe_id)
    }

    /// All recipe ids, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<RecipeId> {
        let mut ids: Vec<RecipeId> = self.recipes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait]
impl Fetcher<RecipeId, Recipe> for CatalogRecipeSource {
    async fn fetch(&self, key: &RecipeId) -> Result<Recipe> {
        self.recipes
            .get(key)
            .cloned()
            .ok_or_else(|| EngineError::RecipeNotFound(*key).into())
    }
}
