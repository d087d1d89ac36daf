//! Failure-isolating cache facade.
//!
//! [`KeyValueCache`] is the only way the rest of the service talks to a
//! cache backend. Every backend error is logged here once, at error level,
//! and turned into an empty result, so an unreachable cache degrades latency
//! and nothing else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ipvault_core::cache::{CacheBackend, DEFAULT_EXPIRATION_SECONDS};

/// Cache handle shared by every request.
///
/// Cloning is cheap and clones share the backend and the default expiration.
#[derive(Clone)]
pub struct KeyValueCache {
    backend: Arc<dyn CacheBackend>,
    default_expiration_secs: Arc<AtomicU64>,
}

impl KeyValueCache {
    /// Wraps a backend, using a one hour default expiration.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            default_expiration_secs: Arc::new(AtomicU64::new(DEFAULT_EXPIRATION_SECONDS)),
        }
    }

    /// Sets the starting default expiration.
    pub fn with_default_expiration(self, ttl: Duration) -> Self {
        self.set_default_expiration(ttl);
        self
    }

    /// Expiration applied when `set` is called without one.
    pub fn default_expiration(&self) -> Duration {
        Duration::from_secs(self.default_expiration_secs.load(Ordering::Relaxed))
    }

    pub fn set_default_expiration(&self, ttl: Duration) {
        self.default_expiration_secs.store(ttl.as_secs(), Ordering::Relaxed);
    }

    /// Stores `value` under `key`. Failures are logged and swallowed.
    pub async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or_else(|| self.default_expiration());
        if let Err(err) = self.backend.set(key, value, ttl).await {
            tracing::error!(operation = "set", key, error = %err, "Error setting cache");
        }
    }

    /// Returns the stored value, or `None` when absent or unreachable.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(operation = "get", key, error = %err, "Error getting cache");
                None
            }
        }
    }

    /// Removes a key, returning how many keys were removed.
    pub async fn delete(&self, key: &str) -> Option<u64> {
        match self.backend.delete(key).await {
            Ok(removed) => Some(removed),
            Err(err) => {
                tracing::error!(
                    operation = "delete",
                    key,
                    error = %err,
                    "Error deleting cache key"
                );
                None
            }
        }
    }

    /// Removes every key matching a glob pattern in one batch.
    ///
    /// Returns `Some(0)` without issuing a delete when nothing matches.
    pub async fn delete_by_pattern(&self, pattern: &str) -> Option<u64> {
        let keys = match self.backend.keys(pattern).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::error!(
                    operation = "delete_by_pattern",
                    pattern,
                    error = %err,
                    "Error listing cache keys"
                );
                return None;
            }
        };

        if keys.is_empty() {
            return Some(0);
        }

        match self.backend.delete_many(&keys).await {
            Ok(removed) => {
                tracing::trace!(pattern, removed, "Cache keys invalidated");
                Some(removed)
            }
            Err(err) => {
                tracing::error!(
                    operation = "delete_by_pattern",
                    pattern,
                    error = %err,
                    "Error deleting cache keys"
                );
                None
            }
        }
    }

    /// Clears the whole cache namespace.
    pub async fn flush_all(&self) -> Option<String> {
        match self.backend.flush_all().await {
            Ok(status) => Some(status),
            Err(err) => {
                tracing::error!(operation = "flush_all", error = %err, "Error flushing cache");
                None
            }
        }
    }

    /// Releases the backend connection.
    pub async fn close(&self) {
        if let Err(err) = self.backend.close().await {
            tracing::error!(operation = "close", error = %err, "Error closing cache");
        }
    }
}
