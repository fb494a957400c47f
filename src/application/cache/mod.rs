//! Memoizing, TTL-expiring, disk-backed cache.
//!
//! - [`PersistentCache`]: wraps a [`Fetcher`](crate::port::Fetcher) with
//!   per-entry TTL and at most one in-flight fetch per key
//! - [`store`]: JSON snapshot file the cache loads on open and writes on `save`

mod persistent;
pub mod store;

pub use persistent::{CacheEntry, PersistentCache};
