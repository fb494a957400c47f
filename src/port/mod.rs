//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the engine and the outside world: where
//! market listings and recipe data come from, and who hears about cost
//! changes.
//!
//! # Available Ports
//!
//! - [`Fetcher`], [`ListingsFetcher`], [`RecipeSource`] - data sources
//!   wrapped by the persistent cache
//! - [`Notifier`] - cost change notifications

pub mod outbound;

pub use outbound::fetch::{from_fn, FnFetcher, Fetcher, ListingsFetcher, RecipeSource};
pub use outbound::notifier::{CostEvent, LogNotifier, Notifier, NotifierRegistry, NullNotifier};
