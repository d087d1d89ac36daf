//! Resource store with cache-aside reads and invalidation on write.

use std::future::Future;
use std::sync::Arc;

use ipvault_core::cache::{
    decode_lookup, encode_absent, encode_resource, encode_resource_page, resource_key,
    resources_page_key, CacheLookup, RESOURCES_PAGE_PATTERN,
};
use ipvault_core::resource::{
    page_count, page_offset, validate_page_request, Pagination, Resource, ResourceInput,
    ResourcePage,
};
use ipvault_core::storage::{ResourceRepository, StoreError};

use crate::cache::KeyValueCache;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Resource CRUD with cache-aside semantics.
///
/// The repository is always the source of truth. Every mutation commits to
/// the repository first; cache refresh and invalidation are then dispatched
/// onto a background task, so a request never waits on (or fails because
/// of) the cache.
///
/// Cached keys:
/// - `resource-{id}`: one resource, or a cached absence
/// - `resources_and_pagination-{page}-{pageSize}-{name}`: one listing page
///
/// Any successful write invalidates every listing page, since a single
/// mutation can shift counts and page boundaries for all of them.
pub struct CacheAsideResourceStore {
    repository: Arc<dyn ResourceRepository>,
    cache: KeyValueCache,
}

impl CacheAsideResourceStore {
    /// Creates a new store.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository (source of truth)
    /// * `cache` - The cache holding serialized copies
    pub fn new(repository: Arc<dyn ResourceRepository>, cache: KeyValueCache) -> Self {
        Self { repository, cache }
    }

    /// Creates a resource.
    ///
    /// Returns `Ok(None)` if the repository reported success without
    /// returning the created row. A duplicate name yields
    /// [`StoreError::Conflict`].
    pub async fn create(&self, input: &ResourceInput) -> Result<Option<Resource>> {
        let rows = self.repository.create(input).await?;

        let Some(resource) = rows.into_iter().next() else {
            tracing::warn!(name = %input.name, "Repository created no rows");
            return Ok(None);
        };

        self.refresh_in_background(&resource);

        tracing::debug!(resource_id = resource.id, name = %resource.name, "Resource created");
        Ok(Some(resource))
    }

    /// Gets one page of resources whose name contains `name_filter`.
    ///
    /// `page` is 1-based. `page` of 0, and `page_size` of 0 or above the
    /// maximum, are rejected with [`StoreError::Validation`].
    pub async fn get_page(
        &self,
        page: u32,
        page_size: u32,
        name_filter: &str,
    ) -> Result<ResourcePage> {
        validate_page_request(page, page_size)?;

        let cache_key = resources_page_key(page, page_size, name_filter);

        // Check cache first
        let cached = self.cache.get(&cache_key).await;
        match decode_lookup::<ResourcePage>(cached.as_deref()) {
            Ok(CacheLookup::Hit(result)) => {
                tracing::trace!(page, page_size, name_filter, "Cache hit for resource page");
                return Ok(result);
            }
            // A listing is never absent; a stray null is just a miss.
            Ok(CacheLookup::Absent | CacheLookup::Miss) => {
                tracing::trace!(page, page_size, name_filter, "Cache miss for resource page");
            }
            Err(err) => {
                tracing::warn!(%cache_key, error = %err, "Cache page deserialization failed");
            }
        }

        let offset = page_offset(page, page_size);
        let (amount, resources) = tokio::try_join!(
            self.repository.count(name_filter),
            self.repository.find_page(page_size, offset, name_filter),
        )?;

        let result = ResourcePage {
            resources,
            pagination: Pagination {
                amount,
                pages: page_count(amount, page_size),
            },
        };

        match encode_resource_page(&result) {
            Ok(bytes) => {
                let cache = self.cache.clone();
                spawn_cache_task(async move { cache.set(&cache_key, &bytes, None).await });
            }
            Err(err) => {
                tracing::warn!(%cache_key, error = %err, "Failed to serialize resource page");
            }
        }

        Ok(result)
    }

    /// Gets a resource by id.
    ///
    /// Absences are cached too: a missing id is answered from the cache
    /// until its entry expires or the id is written.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Resource>> {
        let cache_key = resource_key(id);

        // Check cache first
        let cached = self.cache.get(&cache_key).await;
        match decode_lookup::<Resource>(cached.as_deref()) {
            Ok(CacheLookup::Hit(resource)) => {
                tracing::trace!(resource_id = id, "Cache hit for resource");
                return Ok(Some(resource));
            }
            Ok(CacheLookup::Absent) => {
                tracing::trace!(resource_id = id, "Cache hit for missing resource");
                return Ok(None);
            }
            Ok(CacheLookup::Miss) => {
                tracing::trace!(resource_id = id, "Cache miss for resource");
            }
            Err(err) => {
                tracing::warn!(
                    resource_id = id,
                    error = %err,
                    "Cache resource deserialization failed"
                );
            }
        }

        let resource = self.repository.find_by_id(id).await?;

        let encoded = match &resource {
            Some(found) => encode_resource(found),
            None => Ok(encode_absent()),
        };
        match encoded {
            Ok(bytes) => {
                let cache = self.cache.clone();
                spawn_cache_task(async move { cache.set(&cache_key, &bytes, None).await });
            }
            Err(err) => {
                tracing::warn!(resource_id = id, error = %err, "Failed to serialize resource");
            }
        }

        Ok(resource)
    }

    /// Reads a resource straight from the repository, bypassing the cache.
    ///
    /// Used where a stale or negatively cached copy would be wrong, such as
    /// the base of a partial update. The cache is left untouched.
    pub async fn get_current_by_id(&self, id: i64) -> Result<Option<Resource>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Replaces the fields of a resource.
    ///
    /// Returns `Ok(None)` when no resource has this id. A duplicate name
    /// yields [`StoreError::Conflict`].
    pub async fn update_by_id(&self, id: i64, input: &ResourceInput) -> Result<Option<Resource>> {
        let rows = self.repository.update(id, input).await?;

        let Some(resource) = rows.into_iter().next() else {
            tracing::debug!(resource_id = id, "No resource updated");
            return Ok(None);
        };

        self.refresh_in_background(&resource);

        tracing::debug!(resource_id = id, name = %resource.name, "Resource updated");
        Ok(Some(resource))
    }

    /// Deletes a resource. Deleting an unknown id succeeds.
    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await?;

        let cache = self.cache.clone();
        spawn_cache_task(async move {
            cache.delete(&resource_key(id)).await;
            cache.delete_by_pattern(RESOURCES_PAGE_PATTERN).await;
        });

        tracing::debug!(resource_id = id, "Resource deleted");
        Ok(())
    }

    /// Stores the fresh copy of a written resource and drops every listing.
    fn refresh_in_background(&self, resource: &Resource) {
        let cache_key = resource_key(resource.id);
        let encoded = encode_resource(resource);
        let cache = self.cache.clone();

        spawn_cache_task(async move {
            match encoded {
                Ok(bytes) => cache.set(&cache_key, &bytes, None).await,
                Err(err) => {
                    tracing::warn!(%cache_key, error = %err, "Failed to serialize resource");
                    cache.delete(&cache_key).await;
                }
            }
            cache.delete_by_pattern(RESOURCES_PAGE_PATTERN).await;
        });
    }
}

/// Runs cache maintenance without making the caller wait for it.
///
/// [`KeyValueCache`] already logs and swallows failures, so nothing flows
/// back from the task.
fn spawn_cache_task<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(task);
}
