//! Application services (use cases).
//!
//! - [`graph`]: cost graph, acquisition resolution and propagation
//! - [`scheduler`]: deduplicating recompute queue
//! - [`cache`]: memoizing persistent cache over a fetcher
//! - [`engine`]: single-writer task owning the graph
//! - [`fetch`]: background fetch tasks feeding the engine

pub mod cache;
pub mod engine;
pub mod fetch;
pub mod graph;
pub mod scheduler;
