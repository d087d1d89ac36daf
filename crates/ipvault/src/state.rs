//! Application state shared by every request handler.
//!
//! The storage and cache backends are chosen by feature flags; the factory
//! functions at the bottom of this module wire whichever pair is enabled.

use std::sync::Arc;

use tokio::sync::broadcast;

use ipvault_core::cache::CacheBackend;
use ipvault_core::resource::ResourceEvent;
use ipvault_core::storage::ResourceRepository;

use crate::cache::KeyValueCache;
use crate::config::Config;
use crate::files::FileStore;
use crate::storage::CacheAsideResourceStore;

/// Shared application state.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside store fronting the resource repository.
    pub store: Arc<CacheAsideResourceStore>,
    /// The same cache the store writes through, for administrative calls.
    pub cache: KeyValueCache,
    /// Directory-backed blob store.
    pub files: FileStore,
    /// Resource change notifications for SSE subscribers.
    events_tx: broadcast::Sender<ResourceEvent>,
    /// Shutdown signal sender for SSE connections.
    shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    fn build(
        repository: Arc<dyn ResourceRepository>,
        backend: Arc<dyn CacheBackend>,
        files: FileStore,
        config: &Config,
    ) -> Self {
        let cache = KeyValueCache::new(backend).with_default_expiration(config.cache_ttl());
        let store = Arc::new(CacheAsideResourceStore::new(repository, cache.clone()));
        let (events_tx, _) = broadcast::channel(config.event_channel_capacity);
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            store,
            cache,
            files,
            events_tx,
            shutdown_tx,
        }
    }

    /// Creates the state for the enabled storage and cache backends.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let repository = backends::open_repository(config).await?;
        let cache = backends::open_cache(config).await?;
        let files = FileStore::open(&config.file_store_dir).await?;
        tracing::info!(dir = %files.dir().display(), "File store ready");

        Ok(Self::build(repository, cache, files, config))
    }

    /// Notifies SSE subscribers of a resource change.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, event: ResourceEvent) {
        match self.events_tx.send(event) {
            Ok(receivers) => tracing::trace!(receivers, "Published resource event"),
            Err(_) => tracing::trace!("No subscribers for resource event"),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ResourceEvent> {
        self.events_tx.subscribe()
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all SSE connections to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
impl AppState {
    /// State over caller-supplied backends.
    pub fn for_tests(
        repository: Arc<dyn ResourceRepository>,
        backend: Arc<dyn CacheBackend>,
        files: FileStore,
    ) -> Self {
        let config = Config::from_lookup(|_| None);
        Self::build(repository, backend, files, &config)
    }
}

// ============================================================================
// Factory functions for the enabled backends
// ============================================================================

mod backends {
    use super::*;

    #[cfg(feature = "inmemory")]
    pub async fn open_repository(
        _config: &Config,
    ) -> Result<Arc<dyn ResourceRepository>, anyhow::Error> {
        tracing::info!("Using in-memory resource storage");
        Ok(Arc::new(crate::storage::inmemory::InMemoryRepository::new()))
    }

    #[cfg(feature = "sqlite")]
    pub async fn open_repository(
        config: &Config,
    ) -> Result<Arc<dyn ResourceRepository>, anyhow::Error> {
        tracing::info!(path = %config.sqlite_path, "Using SQLite resource storage");
        let repository = crate::storage::sqlite::SqliteRepository::new(&config.sqlite_path).await?;
        Ok(Arc::new(repository))
    }

    #[cfg(feature = "memory")]
    pub async fn open_cache(config: &Config) -> Result<Arc<dyn CacheBackend>, anyhow::Error> {
        tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
        Ok(Arc::new(crate::cache::memory::MemoryCache::new(
            config.cache_max_entries,
        )))
    }

    #[cfg(feature = "redis")]
    pub async fn open_cache(config: &Config) -> Result<Arc<dyn CacheBackend>, anyhow::Error> {
        tracing::info!(url = %config.redis_url, "Using Redis cache");
        let cache = crate::cache::redis_impl::RedisCache::new(&config.redis_url).await?;
        Ok(Arc::new(cache))
    }
}
