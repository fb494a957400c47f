//! Craftledger - incremental crafting-cost resolution over live market data.
//!
//! For every item the engine decides the cheapest way to obtain one unit:
//! buy it on the market board, craft it from ingredients, or gather it at a
//! fixed fallback cost. Profit is revenue minus that cost. When a price
//! changes, only the items that transitively depend on it are recomputed.
//!
//! # Architecture
//!
//! - [`domain`] - Items, recipes, acquisition actions and listings payloads
//! - [`application::graph`] - The [`CostGraph`](application::graph::CostGraph)
//!   and its dependency-ordered propagation
//! - [`application::cache`] - TTL cache with single-flight fetches and an
//!   on-disk snapshot
//! - [`application::engine`] - Single-writer task applying fetch results
//! - [`port`] - Fetcher and notifier traits
//! - [`adapter`] - Market board HTTP client and recipe catalog
//! - [`infrastructure`] - Configuration, rate limiting and runtime wiring
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use craftledger::application::graph::CostGraph;
//! use craftledger::domain::{IngredientSlot, Item, ItemId, Recipe, RecipeId};
//!
//! let mut graph = CostGraph::new(f64::INFINITY);
//! let recipe = Recipe::try_new(
//!     RecipeId::new(1),
//!     Item::new(ItemId::new(10), "Bronze Ingot"),
//!     vec![IngredientSlot::new(Item::new(ItemId::new(20), "Copper Ore"), 2)],
//! )
//! .unwrap();
//! graph.record_recipe(recipe).unwrap();
//! graph.update_market_data(ItemId::new(20), Some(5.0), None);
//! graph.update_market_data(ItemId::new(10), Some(50.0), Some(40.0));
//! graph.drain();
//!
//! assert_eq!(graph.get_crafting_cost(ItemId::new(10)).unwrap(), Some(10.0));
//! assert_eq!(graph.get_profit(RecipeId::new(1)).unwrap(), Some(30.0));
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

pub use error::{Error, Result};
