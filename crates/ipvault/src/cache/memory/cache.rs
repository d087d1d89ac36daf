//! In-memory cache implementation with LRU eviction.
//!
//! Mirrors the redis backend closely enough that the cache-aside store
//! behaves the same on both: keys expire after their TTL and pattern
//! enumeration uses the same glob dialect as `KEYS`.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use ipvault_core::cache::{pattern_matches, CacheBackend, Result};

/// A single cache entry with its expiration instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache backend with LRU eviction.
///
/// Expiration is lazy: expired entries are dropped when touched and are
/// never returned or enumerated.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` keys.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Removes a key, counting it only if it was still live.
    fn remove_live(store: &mut LruCache<String, CacheEntry>, key: &str) -> u64 {
        match store.pop(key) {
            Some(entry) if !entry.is_expired() => 1,
            _ => 0,
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let mut store = self.store.write().await;
        Ok(Self::remove_live(&mut store, key))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let store = self.store.read().await;
        Ok(store
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        let mut store = self.store.write().await;
        Ok(keys
            .iter()
            .map(|key| Self::remove_live(&mut store, key))
            .sum())
    }

    async fn flush_all(&self) -> Result<String> {
        self.store.write().await.clear();
        Ok("OK".to_string())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
