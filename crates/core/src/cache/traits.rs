use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Operations a key/value store must offer to back the resource cache.
///
/// Implementations report every transport failure as an error; isolating the
/// rest of the service from those failures is the caller's job.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Gets a value by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Deletes a key, returning how many keys were removed.
    async fn delete(&self, key: &str) -> Result<u64>;

    /// Lists the live keys matching a glob pattern.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Deletes a batch of keys in one round trip.
    async fn delete_many(&self, keys: &[String]) -> Result<u64>;

    /// Removes every key, returning the backend's status reply.
    async fn flush_all(&self) -> Result<String>;

    /// Releases the underlying connection.
    async fn close(&self) -> Result<()>;
}
