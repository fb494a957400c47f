//! Domain types: items, recipes, acquisition actions and market data.

mod action;
mod cost;
mod listing;
mod recipe;
mod summary;

pub mod error;
pub mod id;

pub use action::AcquireAction;
pub use cost::ItemCostState;
pub use error::DomainError;
pub use id::{ItemId, ItemMarketKey, Market, RecipeId};
pub use listing::{Listing, Listings, MarketSnapshot, Sale};
pub use recipe::{ClassJob, IngredientSlot, Item, Recipe, MAX_INGREDIENTS};
pub use summary::RecipeSummary;
