//! Generic memoizing cache over a [`Fetcher`].
//!
//! All table reads and writes plus the in-flight bookkeeping sit behind one
//! lock. The fetch itself runs outside the lock; a per-key broadcast sender
//! held in the table marks the fetch as in flight so concurrent callers for
//! the same key wait on it instead of fetching again.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::store::{SnapshotEntry, SnapshotFile};
use crate::error::{CacheError, Error, Result};
use crate::port::Fetcher;

type Shared<V> = std::result::Result<V, Arc<Error>>;

/// A cached value and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Valid while `now - fetched_at < ttl`. Entries stamped in the future
    /// count as fresh.
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

struct Table<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    in_flight: HashMap<K, broadcast::Sender<Shared<V>>>,
}

enum Persistence {
    Memory,
    File(SnapshotFile),
    /// Loading failed; saving is refused for the rest of the session.
    Disabled { path: PathBuf, error: CacheError },
}

enum Slot<V> {
    Hit(V),
    Wait(broadcast::Receiver<Shared<V>>),
    Lead,
}

/// Removes the in-flight marker if the leading fetch is dropped early.
///
/// Waiters then see a closed channel and retry, one of them taking over.
struct InFlightGuard<'a, K: Eq + Hash, V> {
    table: &'a Mutex<Table<K, V>>,
    key: &'a K,
    armed: bool,
}

impl<K: Eq + Hash, V> Drop for InFlightGuard<'_, K, V> {
    fn drop(&mut self) {
        if self.armed {
            self.table.lock().in_flight.remove(self.key);
        }
    }
}

/// Memoizing cache with per-entry TTL and a JSON snapshot on disk.
pub struct PersistentCache<K, V> {
    fetcher: Arc<dyn Fetcher<K, V>>,
    ttl: Duration,
    table: Mutex<Table<K, V>>,
    persistence: Persistence,
}

impl<K, V> PersistentCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Display + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Cache without a backing file.
    #[must_use]
    pub fn in_memory(fetcher: Arc<dyn Fetcher<K, V>>, ttl: Duration) -> Self {
        Self::with_persistence(fetcher, ttl, Persistence::Memory)
    }

    fn with_persistence(
        fetcher: Arc<dyn Fetcher<K, V>>,
        ttl: Duration,
        persistence: Persistence,
    ) -> Self {
        Self {
            fetcher,
            ttl,
            table: Mutex::new(Table {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            }),
            persistence,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a fresh cached value or fetch one.
    ///
    /// Concurrent callers for a key that is already being fetched wait for
    /// that fetch. A failed fetch is not cached and every caller waiting on
    /// it receives the same [`CacheError::Fetch`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Fetch`] wrapping the fetcher's error.
    pub async fn get(&self, key: &K) -> Result<V> {
        loop {
            let slot = {
                let mut table = self.table.lock();
                let now = Utc::now();
                match table.entries.get(key) {
                    Some(entry) if entry.is_fresh(self.ttl, now) => Slot::Hit(entry.value.clone()),
                    _ => match table.in_flight.get(key) {
                        Some(tx) => Slot::Wait(tx.subscribe()),
                        None => {
                            let (tx, _) = broadcast::channel(1);
                            table.in_flight.insert(key.clone(), tx);
                            Slot::Lead
                        }
                    },
                }
            };

            match slot {
                Slot::Hit(value) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(value);
                }
                Slot::Lead => return self.lead(key).await,
                Slot::Wait(mut rx) => {
                    debug!(key = %key, "Waiting on in-flight fetch");
                    match rx.recv().await {
                        Ok(shared) => return shared.map_err(|e| CacheError::Fetch(e).into()),
                        // Leader went away without an answer; try again.
                        Err(_) => continue,
                    }
                }
            }
        }
    }

    async fn lead(&self, key: &K) -> Result<V> {
        let mut guard = InFlightGuard {
            table: &self.table,
            key,
            armed: true,
        };
        debug!(key = %key, "Cache miss, fetching");
        let shared: Shared<V> = self.fetcher.fetch(key).await.map_err(Arc::new);

        {
            let mut table = self.table.lock();
            let tx = table.in_flight.remove(key);
            if let Ok(value) = &shared {
                table.entries.insert(
                    key.clone(),
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: Utc::now(),
                    },
                );
            }
            if let Some(tx) = tx {
                // No receivers is fine.
                let _ = tx.send(shared.clone());
            }
            guard.armed = false;
        }

        if let Err(e) = &shared {
            warn!(key = %key, error = %e, "Fetch failed");
        }
        shared.map_err(|e| CacheError::Fetch(e).into())
    }

    /// Store a value as fetched now.
    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    /// Store a value with an explicit fetch timestamp.
    pub fn insert_at(&self, key: K, value: V, fetched_at: DateTime<Utc>) {
        self.table
            .lock()
            .entries
            .insert(key, CacheEntry { value, fetched_at });
    }

    /// Fresh cached value without fetching.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<V> {
        let table = self.table.lock();
        table
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl, Utc::now()))
            .map(|entry| entry.value.clone())
    }

    #[must_use]
    pub fn contains_fresh(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    /// Drop an entry so the next `get` fetches. Returns true if one existed.
    pub fn invalidate(&self, key: &K) -> bool {
        self.table.lock().entries.remove(key).is_some()
    }

    /// Remove expired entries. Returns count removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let ttl = self.ttl;
        let mut table = self.table.lock();
        let before = table.entries.len();
        table.entries.retain(|_, entry| entry.is_fresh(ttl, now));
        before - table.entries.len()
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fetches currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.table.lock().in_flight.len()
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.persistence {
            Persistence::Memory => None,
            Persistence::File(file) => Some(file.path()),
            Persistence::Disabled { path, .. } => Some(path),
        }
    }

    /// Why persistence was disabled at open, if it was.
    #[must_use]
    pub fn persistence_error(&self) -> Option<&CacheError> {
        match &self.persistence {
            Persistence::Disabled { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl<K, V> PersistentCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Display + Serialize + DeserializeOwned + 'static,
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    /// Cache seeded from the snapshot at `path`.
    ///
    /// Only entries still fresh are loaded. If the file exists but cannot be
    /// read the cache runs in memory for this session and [`save`] refuses to
    /// overwrite the file.
    ///
    /// [`save`]: Self::save
    #[must_use]
    pub fn open(fetcher: Arc<dyn Fetcher<K, V>>, ttl: Duration, path: impl Into<PathBuf>) -> Self {
        let file = SnapshotFile::new(path);
        match file.load::<K, V>() {
            Ok(entries) => {
                let cache = Self::with_persistence(fetcher, ttl, Persistence::File(file));
                let now = Utc::now();
                let total = entries.len();
                let mut loaded = 0usize;
                {
                    let mut table = cache.table.lock();
                    for SnapshotEntry {
                        key,
                        value,
                        fetched_at,
                    } in entries
                    {
                        let entry = CacheEntry { value, fetched_at };
                        if entry.is_fresh(ttl, now) {
                            table.entries.insert(key, entry);
                            loaded += 1;
                        }
                    }
                }
                info!(
                    path = ?cache.path(),
                    loaded,
                    expired = total - loaded,
                    "Cache snapshot loaded"
                );
                cache
            }
            Err(error) => {
                warn!(error = %error, "Cache snapshot unreadable, persistence disabled");
                let path = file.path().to_path_buf();
                Self::with_persistence(fetcher, ttl, Persistence::Disabled { path, error })
            }
        }
    }

    /// Write every fresh entry to the backing file. Returns count written.
    ///
    /// An in-memory cache saves nothing and returns `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::PersistenceDisabled`] after a failed load and
    /// [`CacheError::Save`] on I/O failure.
    pub fn save(&self) -> Result<usize> {
        let file = match &self.persistence {
            Persistence::Memory => return Ok(0),
            Persistence::File(file) => file,
            Persistence::Disabled { path, .. } => {
                return Err(CacheError::PersistenceDisabled(path.clone()).into())
            }
        };

        // Encode under the lock, write outside it.
        let (bytes, count) = {
            let table = self.table.lock();
            let now = Utc::now();
            let entries: Vec<SnapshotEntry<K, V>> = table
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_fresh(self.ttl, now))
                .map(|(key, entry)| SnapshotEntry {
                    key: key.clone(),
                    value: entry.value.clone(),
                    fetched_at: entry.fetched_at,
                })
                .collect();
            let count = entries.len();
            (file.encode(entries)?, count)
        };

        file.write(&bytes)?;
        info!(path = %file.path().display(), entries = count, "Cache snapshot saved");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::port::from_fn;

    fn counting_cache(ttl: Duration) -> (PersistentCache<u32, String>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fetcher = from_fn(move |key: u32| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(format!("value-{key}"))
            }
        });
        (PersistentCache::in_memory(Arc::new(fetcher), ttl), calls)
    }

    #[test]
    fn test_entry_freshness() {
        let now = Utc::now();
        let ttl = Duration::seconds(10);
        let entry = |age: i64| CacheEntry {
            value: (),
            fetched_at: now - Duration::seconds(age),
        };
        assert!(entry(0).is_fresh(ttl, now));
        assert!(entry(9).is_fresh(ttl, now));
        assert!(!entry(10).is_fresh(ttl, now));
        assert!(entry(-5).is_fresh(ttl, now));
    }

    #[tokio::test]
    async fn test_hit_does_not_fetch() {
        let (cache, calls) = counting_cache(Duration::hours(1));
        assert_eq!(cache.get(&1).await.unwrap(), "value-1");
        assert_eq!(cache.get(&1).await.unwrap(), "value-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let (cache, calls) = counting_cache(Duration::hours(1));
        cache.insert_at(1, "old".into(), Utc::now() - Duration::hours(2));
        assert_eq!(cache.get(&1).await.unwrap(), "value-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_purge_and_invalidate() {
        let (cache, _) = counting_cache(Duration::hours(1));
        cache.insert(1, "fresh".into());
        cache.insert_at(2, "stale".into(), Utc::now() - Duration::hours(2));
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_fresh(&2));

        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.invalidate(&1));
        assert!(!cache.invalidate(&1));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fetcher = from_fn(move |_key: u32| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(Error::ChannelClosed("upstream"))
                } else {
                    Ok("recovered".to_string())
                }
            }
        });
        let cache = PersistentCache::in_memory(Arc::new(fetcher), Duration::hours(1));

        let err = cache.get(&1).await.unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::Fetch(_))));
        assert_eq!(cache.get(&1).await.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_in_memory_save_is_a_no_op() {
        let (cache, _) = counting_cache(Duration::hours(1));
        cache.get(&1).await.unwrap();
        assert_eq!(cache.save().unwrap(), 0);
        assert!(cache.path().is_none());
    }
}
