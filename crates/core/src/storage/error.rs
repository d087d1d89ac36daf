use thiserror::Error;

use crate::resource::ResourceError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} {field} must be unique")]
    UniqueViolation {
        entity_type: &'static str,
        field: &'static str,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors surfaced by the cache-aside resource store.
///
/// Uniqueness violations reported by the repository become [`StoreError::Conflict`];
/// every other repository failure is carried unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate key")]
    Conflict {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Validation(#[from] ResourceError),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation { field, .. } => StoreError::Conflict {
                field,
                message: duplicate_field_message(field),
            },
            other => StoreError::Repository(other),
        }
    }
}

/// Human-readable message for a value that collides with an existing one.
pub fn duplicate_field_message(field: &str) -> String {
    format!("Can not have an already existing {field}")
}
