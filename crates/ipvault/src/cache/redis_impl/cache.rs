//! Redis cache implementation.
//!
//! Pattern deletion enumerates with `KEYS` and removes the matches with a
//! single `DEL`. `KEYS` walks the whole keyspace, which is acceptable for the
//! small, dedicated databases this service is deployed against.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use ipvault_core::cache::{CacheBackend, Result};

use super::error::map_redis_error;

/// Redis cache backend using a connection manager for reconnection.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // SET EX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await.map_err(map_redis_error)?;
        Ok(removed)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await.map_err(map_redis_error)?;
        Ok(keys)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(keys).await.map_err(map_redis_error)?;
        Ok(removed)
    }

    async fn flush_all(&self) -> Result<String> {
        let mut conn = self.conn.clone();
        let status: String = redis::cmd("FLUSHALL")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(status)
    }

    async fn close(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("QUIT")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}
