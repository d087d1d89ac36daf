//! Startup seed data.

use ipvault_core::resource::ResourceInput;
use ipvault_core::storage::StoreError;

use crate::storage::CacheAsideResourceStore;

/// The resource every fresh deployment starts with.
pub fn default_resources() -> Vec<ResourceInput> {
    vec![ResourceInput::new("Seguente-utility", "127.0.0.0")]
}

/// Inserts the default resources, skipping any that already exist.
///
/// Returns how many were created.
pub async fn seed(store: &CacheAsideResourceStore) -> Result<usize, StoreError> {
    let mut created = 0;
    for input in default_resources() {
        match store.create(&input).await {
            Ok(Some(resource)) => {
                tracing::info!(id = resource.id, name = %resource.name, "Seeded resource");
                created += 1;
            }
            Ok(None) => tracing::warn!(name = %input.name, "Seed resource was not created"),
            Err(StoreError::Conflict { .. }) => {
                tracing::debug!(name = %input.name, "Seed resource already present");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::KeyValueCache;
    use crate::test_support::{MockCacheBackend, MockResourceRepository};
    use ipvault_core::resource::validate_resource_input;
    use ipvault_core::storage::RepositoryError;

    fn store(repo: Arc<MockResourceRepository>) -> CacheAsideResourceStore {
        let cache = KeyValueCache::new(Arc::new(MockCacheBackend::new()));
        CacheAsideResourceStore::new(repo, cache)
    }

    #[test]
    fn test_default_resources_are_valid() {
        for input in default_resources() {
            assert!(validate_resource_input(&input).is_ok(), "{input:?}");
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repo = Arc::new(MockResourceRepository::new());
        let store = store(repo.clone());

        assert_eq!(seed(&store).await.unwrap(), 1);
        assert_eq!(seed(&store).await.unwrap(), 0);

        let seeded = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(seeded.name, "Seguente-utility");
        assert_eq!(seeded.ip, "127.0.0.0");
    }

    #[tokio::test]
    async fn test_seed_propagates_outages() {
        let repo = Arc::new(MockResourceRepository::new());
        *repo.failure.lock().unwrap() = Some(RepositoryError::ConnectionFailed("down".to_string()));

        let err = seed(&store(repo)).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Repository(RepositoryError::ConnectionFailed(_))
        ));
    }
}
