use std::{env, str::FromStr, time::Duration};

use ipvault_core::cache::DEFAULT_EXPIRATION_SECONDS;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default cache TTL in seconds (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of entries in the memory cache (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "ipvault.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Directory backing the file store (default: "data")
    pub file_store_dir: String,
    /// Buffered resource events per SSE subscriber (default: 100)
    pub event_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "ipvault.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `FILE_STORE_DIR` - File store directory (default: "data")
    /// - `EVENT_CHANNEL_CAPACITY` - SSE event buffer (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            cache_ttl_seconds: parsed(&lookup, "CACHE_TTL_SECONDS")
                .unwrap_or(DEFAULT_EXPIRATION_SECONDS),
            cache_max_entries: parsed(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(10_000),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "ipvault.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            file_store_dir: lookup("FILE_STORE_DIR").unwrap_or_else(|| "data".to_string()),
            event_channel_capacity: parsed(&lookup, "EVENT_CHANNEL_CAPACITY")
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(100),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

/// Reads `key` and parses it, ignoring surrounding whitespace.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}
