//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use ipvault_core::resource::{name_matches_filter, Resource, ResourceInput};
use ipvault_core::storage::{RepositoryError, ResourceRepository, Result};

/// In-memory storage backend.
///
/// Ids are assigned from a counter starting at 1 and never reused.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    resources: Arc<RwLock<BTreeMap<i64, Resource>>>,
    last_id: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            resources: Arc::new(RwLock::new(BTreeMap::new())),
            last_id: Arc::new(AtomicI64::new(0)),
        }
    }
}

fn duplicate_name() -> RepositoryError {
    RepositoryError::UniqueViolation {
        entity_type: "Resource",
        field: "name",
    }
}

fn matching<'a>(
    resources: &'a BTreeMap<i64, Resource>,
    name_filter: &'a str,
) -> impl Iterator<Item = &'a Resource> + 'a {
    resources
        .values()
        .filter(move |r| name_matches_filter(&r.name, name_filter))
}

#[async_trait]
impl ResourceRepository for InMemoryRepository {
    async fn create(&self, input: &ResourceInput) -> Result<Vec<Resource>> {
        let mut resources = self.resources.write().await;
        if resources.values().any(|r| r.name == input.name) {
            return Err(duplicate_name());
        }

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let resource = Resource {
            id,
            name: input.name.clone(),
            ip: input.ip.clone(),
            created_at: now,
            updated_at: now,
        };
        resources.insert(id, resource.clone());
        Ok(vec![resource])
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Resource>> {
        let resources = self.resources.read().await;
        Ok(resources.get(&id).cloned())
    }

    async fn find_page(
        &self,
        limit: u32,
        offset: u64,
        name_filter: &str,
    ) -> Result<Vec<Resource>> {
        let resources = self.resources.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(matching(&resources, name_filter)
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, name_filter: &str) -> Result<u64> {
        let resources = self.resources.read().await;
        Ok(matching(&resources, name_filter).count() as u64)
    }

    async fn update(&self, id: i64, input: &ResourceInput) -> Result<Vec<Resource>> {
        let mut resources = self.resources.write().await;
        if resources
            .values()
            .any(|r| r.id != id && r.name == input.name)
        {
            return Err(duplicate_name());
        }

        let Some(resource) = resources.get_mut(&id) else {
            return Ok(vec![]);
        };
        resource.name = input.name.clone();
        resource.ip = input.ip.clone();
        resource.updated_at = Utc::now();
        Ok(vec![resource.clone()])
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.resources.write().await.remove(&id);
        Ok(())
    }
}
