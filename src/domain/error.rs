//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use craftledger::domain::error::DomainError;
//! use craftledger::domain::{IngredientSlot, Item, ItemId, Recipe, RecipeId};
//!
//! let result = Recipe::try_new(
//!     RecipeId::new(1),
//!     Item::new(ItemId::new(10), "Bronze Ingot"),
//!     vec![IngredientSlot::new(Item::new(ItemId::new(11), "Copper Ore"), 0)],
//! );
//!
//! assert!(matches!(result, Err(DomainError::ZeroQuantity { .. })));
//! ```

use thiserror::Error;

use super::id::{ItemId, RecipeId};

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A recipe holds at most [`MAX_INGREDIENTS`](super::recipe::MAX_INGREDIENTS) slots.
    #[error("recipe {recipe_id} has {count} ingredients, at most {max} allowed")]
    TooManyIngredients {
        recipe_id: RecipeId,
        count: usize,
        max: usize,
    },

    /// Every ingredient slot must consume at least one unit.
    #[error("recipe {recipe_id} uses zero of ingredient {item_id}")]
    ZeroQuantity { recipe_id: RecipeId, item_id: ItemId },
}
