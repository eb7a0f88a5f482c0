//! In-memory TTL caching for fetched records.
//!
//! An explicit collaborator object instead of transparent wrapping:
//! clients call [`TtlCache::get_or_fetch`] and get back the value plus
//! the moment it was actually fetched, which is what the freshness gate
//! inspects downstream.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::Mutex;

/// Cache TTLs per record kind. These govern re-fetching only; record
/// usability is the freshness gate's call.
pub const COORDINATES_TTL: Duration = Duration::from_secs(10 * 60);
pub const BUYER_TTL: Duration = Duration::from_secs(2 * 60);
pub const HOTSPOT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fetched on this call.
    Fresh,
    /// Served from a still-valid entry.
    Cached,
    /// Fetch failed; an expired entry was served instead.
    Stale,
}

/// A cached value plus its provenance.
#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub value: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

struct Entry<V> {
    value: V,
    fetched_at: SystemTime,
}

impl<V: Clone> Entry<V> {
    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<V>> {
        let fresh = self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false);
        fresh.then(|| CachedPayload {
            value: self.value.clone(),
            fetched_at: self.fetched_at,
            status: CacheStatus::Cached,
        })
    }

    fn stale(&self) -> CachedPayload<V> {
        CachedPayload {
            value: self.value.clone(),
            fetched_at: self.fetched_at,
            status: CacheStatus::Stale,
        }
    }
}

/// Keyed in-memory cache with a single TTL per cache instance.
#[derive(Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<Mutex<HashMap<K, Entry<V>>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Serve a fresh entry, or run `fetch` and store the result.
    /// When the fetch fails and an expired entry exists, the stale entry
    /// is served instead of the error (partial data beats no data).
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<CachedPayload<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        {
            let entries = self.entries.lock().await;
            if let Some(payload) = entries.get(&key).and_then(|entry| entry.if_fresh(self.ttl)) {
                return Ok(payload);
            }
        }

        match fetch().await {
            Ok(value) => {
                let fetched_at = SystemTime::now();
                let payload = CachedPayload {
                    value: value.clone(),
                    fetched_at,
                    status: CacheStatus::Fresh,
                };
                self.entries
                    .lock()
                    .await
                    .insert(key, Entry { value, fetched_at });
                Ok(payload)
            }
            Err(error) => {
                let entries = self.entries.lock().await;
                match entries.get(&key) {
                    Some(entry) => Ok(entry.stale()),
                    None => Err(error),
                }
            }
        }
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
