// Per-room fetch coalescing.
//
// The scraper is only ever allowed one external fetch in flight per auction
// room. Concurrent requests for the same room share that single fetch, and
// results are served from a TTL cache until they go stale. The cache owns no
// I/O itself: the caller supplies the fetch future, so the analytic core
// stays pure and this handle stays testable.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// A keyed single-flight cache with a fixed TTL.
///
/// `get_or_fetch` returns a cached value when it is fresh, otherwise runs the
/// supplied fetch under a per-key lock. Callers that arrive while a fetch is
/// in flight block on that lock and then pick up the freshly cached value
/// instead of issuing a duplicate fetch. Failed fetches are never cached.
pub struct CoalescingCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<T: Clone> CoalescingCache<T> {
    pub fn new(ttl: Duration) -> Self {
        CoalescingCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if it is within the TTL.
    async fn fresh(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Get or lazily create the per-key fetch lock.
    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Serve `key` from cache, or run `fetch` exactly once for all concurrent
    /// callers of the same key.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.fresh(key).await {
            debug!("cache hit for key '{}'", key);
            return Ok(value);
        }

        let lock = self.key_lock(key).await;
        let _guard = lock.lock().await;

        // Another caller may have completed the fetch while we waited.
        if let Some(value) = self.fresh(key).await {
            debug!("coalesced onto completed fetch for key '{}'", key);
            return Ok(value);
        }

        let value = fetch().await?;
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Drop the cached value for `key`, forcing the next caller to fetch.
    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
