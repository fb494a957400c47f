mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use craftledger::application::cache::PersistentCache;
use craftledger::domain::{ItemId, ItemMarketKey, Listings};
use craftledger::error::{CacheError, Error};
use craftledger::port::{from_fn, Fetcher};
use support::recipes::listings;
use tokio::time::sleep;

type ListingsCache = PersistentCache<ItemMarketKey, Listings>;

fn key(item: u32) -> ItemMarketKey {
    ItemMarketKey::new(ItemId::new(item), "55")
}

fn counting_fetcher(calls: Arc<AtomicUsize>) -> Arc<dyn Fetcher<ItemMarketKey, Listings>> {
    Arc::new(from_fn(move |key: ItemMarketKey| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            sleep(StdDuration::from_millis(20)).await;
            Ok(listings(key.item_id.value(), &[100.0], 1.0))
        }
    }))
}

fn failing_fetcher() -> Arc<dyn Fetcher<ItemMarketKey, Listings>> {
    Arc::new(from_fn(|_key: ItemMarketKey| async move {
        Err::<Listings, _>(Error::ChannelClosed("offline"))
    }))
}

#[tokio::test]
async fn saved_entries_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("listings.json");
    let calls = Arc::new(AtomicUsize::new(0));

    let cache = ListingsCache::open(counting_fetcher(Arc::clone(&calls)), Duration::hours(1), &path);
    assert!(cache.persistence_error().is_none());
    let fetched = cache.get(&key(1)).await.unwrap();
    assert_eq!(cache.save().unwrap(), 1);
    assert!(path.exists());

    let reopened = ListingsCache::open(failing_fetcher(), Duration::hours(1), &path);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(&key(1)).await.unwrap(), fetched);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_snapshot_entries_are_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.json");

    let cache = ListingsCache::open(failing_fetcher(), Duration::weeks(1), &path);
    cache.insert_at(key(1), listings(1, &[5.0], 1.0), Utc::now() - Duration::hours(2));
    cache.insert(key(2), listings(2, &[6.0], 1.0));
    assert_eq!(cache.save().unwrap(), 2);

    let reopened = ListingsCache::open(failing_fetcher(), Duration::hours(1), &path);
    assert_eq!(reopened.len(), 1);
    assert!(reopened.contains_fresh(&key(2)));
    assert!(!reopened.contains_fresh(&key(1)));
}

#[tokio::test]
async fn expired_entry_is_fetched_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = ListingsCache::in_memory(counting_fetcher(Arc::clone(&calls)), Duration::hours(1));
    cache.insert_at(key(1), listings(1, &[1.0], 1.0), Utc::now() - Duration::hours(2));

    let first = cache.get(&key(1)).await.unwrap();
    let second = cache.get(&key(1)).await.unwrap();

    assert_eq!(first.listings[0].price_per_unit, 100.0);
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_gets_share_one_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(ListingsCache::in_memory(
        counting_fetcher(Arc::clone(&calls)),
        Duration::hours(1),
    ));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get(&key(7)).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().item_id, ItemId::new(7));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_fetch_is_shared_and_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fetcher: Arc<dyn Fetcher<ItemMarketKey, Listings>> =
        Arc::new(from_fn(move |key: ItemMarketKey| {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                sleep(StdDuration::from_millis(30)).await;
                if n == 0 {
                    Err(Error::ChannelClosed("first attempt"))
                } else {
                    Ok(listings(key.item_id.value(), &[9.0], 1.0))
                }
            }
        }));
    let cache = Arc::new(ListingsCache::in_memory(fetcher, Duration::hours(1)));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get(&key(3)).await })
        })
        .collect();
    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::Fetch(_))));
        assert!(err.to_string().contains("first attempt"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_empty());

    cache.get(&key(3)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn corrupt_snapshot_disables_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let cache = ListingsCache::open(counting_fetcher(Arc::clone(&calls)), Duration::hours(1), &path);
    assert!(matches!(
        cache.persistence_error(),
        Some(CacheError::Load { .. })
    ));

    // Still serves from the fetcher.
    cache.get(&key(1)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let err = cache.save().unwrap_err();
    assert!(matches!(
        err,
        Error::Cache(CacheError::PersistenceDisabled(_))
    ));
    assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
}

#[tokio::test]
async fn invalidate_forces_a_refetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = ListingsCache::in_memory(counting_fetcher(Arc::clone(&calls)), Duration::hours(1));

    cache.get(&key(4)).await.unwrap();
    assert!(cache.invalidate(&key(4)));
    cache.get(&key(4)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
