//! Cache-aside resource store.
//!
//! Composes a [`ResourceRepository`](ipvault_core::storage::ResourceRepository)
//! with a [`KeyValueCache`](crate::cache::KeyValueCache):
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then refresh and invalidate cache
//!
//! Cache maintenance runs on spawned tasks the caller never waits for.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(SqliteRepository::new("ipvault.db").await?);
//! let cache = KeyValueCache::new(Arc::new(MemoryCache::new(10_000)));
//!
//! let store = CacheAsideResourceStore::new(repo, cache);
//! ```

mod resource;

pub use resource::CacheAsideResourceStore;
