//! Static item and recipe reference data.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{ItemId, RecipeId};

/// Maximum number of ingredient slots on a recipe.
pub const MAX_INGREDIENTS: usize = 9;

/// A tradeable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One ordered ingredient slot of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSlot {
    pub item: Item,
    pub quantity: u32,
    /// Alternative recipes that produce this ingredient.
    #[serde(default)]
    pub recipes: Vec<RecipeId>,
}

impl IngredientSlot {
    #[must_use]
    pub fn new(item: Item, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            recipes: Vec::new(),
        }
    }

    /// Attach the recipes that can craft this ingredient.
    #[must_use]
    pub fn with_recipes(mut self, recipes: Vec<RecipeId>) -> Self {
        self.recipes = recipes;
        self
    }
}

/// Crafting job metadata shown alongside a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassJob {
    pub abbreviation: String,
    pub level: u32,
}

/// A recipe producing exactly one result item from up to nine ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    id: RecipeId,
    result: Item,
    ingredients: Vec<IngredientSlot>,
    #[serde(default)]
    job: Option<ClassJob>,
}

impl Recipe {
    /// Create a validated recipe.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TooManyIngredients`] for more than
    /// [`MAX_INGREDIENTS`] slots and [`DomainError::ZeroQuantity`] for a slot
    /// with quantity zero.
    pub fn try_new(
        id: RecipeId,
        result: Item,
        ingredients: Vec<IngredientSlot>,
    ) -> Result<Self, DomainError> {
        let recipe = Self {
            id,
            result,
            ingredients,
            job: None,
        };
        recipe.validate()?;
        Ok(recipe)
    }

    /// Check slot count and quantities.
    ///
    /// Recipes deserialized from a catalog bypass `try_new`, so sources call
    /// this before handing them to the engine.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ingredients.len() > MAX_INGREDIENTS {
            return Err(DomainError::TooManyIngredients {
                recipe_id: self.id,
                count: self.ingredients.len(),
                max: MAX_INGREDIENTS,
            });
        }
        if let Some(slot) = self.ingredients.iter().find(|slot| slot.quantity == 0) {
            return Err(DomainError::ZeroQuantity {
                recipe_id: self.id,
                item_id: slot.item.id,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn with_job(mut self, abbreviation: impl Into<String>, level: u32) -> Self {
        self.job = Some(ClassJob {
            abbreviation: abbreviation.into(),
            level,
        });
        self
    }

    #[must_use]
    pub const fn id(&self) -> RecipeId {
        self.id
    }

    #[must_use]
    pub const fn result(&self) -> &Item {
        &self.result
    }

    #[must_use]
    pub fn ingredients(&self) -> &[IngredientSlot] {
        &self.ingredients
    }

    #[must_use]
    pub const fn job(&self) -> Option<&ClassJob> {
        self.job.as_ref()
    }

    /// Alternative recipes referenced by any ingredient slot.
    pub fn ingredient_recipes(&self) -> impl Iterator<Item = RecipeId> + '_ {
        self.ingredients
            .iter()
            .flat_map(|slot| slot.recipes.iter().copied())
    }
}
