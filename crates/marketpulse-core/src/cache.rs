//! In-memory query cache for fetched series.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::config::CACHE_TTL;
use crate::{FetchRequest, SeriesResponse};

/// Defines how a single fetch interacts with the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Serve a fresh entry when present; otherwise fetch and store. (Default)
    #[default]
    Use,
    /// Always fetch, then overwrite the entry.
    Refresh,
    /// Always fetch and leave the cache untouched.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        !matches!(self, Self::Bypass)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    response: SeriesResponse,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<FetchRequest, CacheEntry>,
    ttl: Duration,
}

impl CacheInner {
    fn get(&self, key: &FetchRequest) -> Option<SeriesResponse> {
        self.map
            .get(key)
            .filter(|entry| Instant::now() <= entry.expires_at)
            .map(|entry| entry.response.clone())
    }

    // Expired entries are dropped on every write so distinct custom ranges
    // do not accumulate.
    fn put(&mut self, key: FetchRequest, response: SeriesResponse) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
        self.map.insert(
            key,
            CacheEntry {
                response,
                expires_at: now + self.ttl,
            },
        );
    }
}

/// Series cache keyed by request parameters with a fixed freshness window.
///
/// Changing any parameter produces a different key, so stale parameters never
/// serve a newer query. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    inner: Arc<RwLock<CacheInner>>,
    in_flight: Arc<Mutex<HashMap<FetchRequest, Arc<Mutex<()>>>>>,
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                map: HashMap::new(),
                ttl,
            })),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn is_disabled(&self) -> bool {
        self.inner.read().await.ttl == Duration::ZERO
    }

    /// Returns the entry for `key` if it is still fresh.
    pub async fn get(&self, key: &FetchRequest) -> Option<SeriesResponse> {
        self.inner.read().await.get(key)
    }

    /// Stores `response`. No-op when the cache is disabled.
    pub async fn put(&self, key: FetchRequest, response: SeriesResponse) {
        let mut store = self.inner.write().await;
        if store.ttl == Duration::ZERO {
            return;
        }
        store.put(key, response);
    }

    pub async fn invalidate(&self, key: &FetchRequest) -> bool {
        self.inner.write().await.map.remove(key).is_some()
    }

    pub async fn clear_expired(&self) {
        let now = Instant::now();
        self.inner
            .write()
            .await
            .map
            .retain(|_, entry| entry.expires_at > now);
    }

    pub async fn clear(&self) {
        self.inner.write().await.map.clear();
        self.in_flight.lock().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Serializes fetches of the same key so concurrent callers share one
    /// network round trip. Hold the guard across check, fetch and store.
    pub async fn lock_key(&self, key: &FetchRequest) -> OwnedMutexGuard<()> {
        let slot = {
            let mut in_flight = self.in_flight.lock().await;
            // A slot referenced only by the map has no holder and no waiter.
            in_flight.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(in_flight.entry(*key).or_default())
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}
