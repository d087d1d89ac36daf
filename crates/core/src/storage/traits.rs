use async_trait::async_trait;

use crate::resource::{Resource, ResourceInput};

use super::Result;

/// Repository for resource persistence.
///
/// Writes return the affected rows so callers can tell "nothing happened"
/// apart from failures. A duplicate name must be reported as
/// [`RepositoryError::UniqueViolation`](super::RepositoryError::UniqueViolation)
/// with `field = "name"`.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Inserts a resource, returning the created rows.
    async fn create(&self, input: &ResourceInput) -> Result<Vec<Resource>>;

    /// Gets a resource by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Resource>>;

    /// Fetches up to `limit` resources whose name contains `name_filter`,
    /// skipping the first `offset`, in ascending id order.
    async fn find_page(&self, limit: u32, offset: u64, name_filter: &str)
        -> Result<Vec<Resource>>;

    /// Counts the resources whose name contains `name_filter`.
    async fn count(&self, name_filter: &str) -> Result<u64>;

    /// Replaces the fields of a resource, returning the updated rows.
    ///
    /// An unknown id yields no rows rather than an error.
    async fn update(&self, id: i64, input: &ResourceInput) -> Result<Vec<Resource>>;

    /// Deletes a resource. Deleting an unknown id is not an error.
    async fn delete(&self, id: i64) -> Result<()>;
}
