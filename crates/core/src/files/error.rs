use thiserror::Error;

/// Errors that can occur in the locked file store.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),
    #[error("File store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for file store operations.
pub type Result<T> = std::result::Result<T, FileStoreError>;

/// Maps a [`FileStoreError`] to an HTTP status code.
pub fn file_store_error_to_status_code(error: &FileStoreError) -> u16 {
    match error {
        FileStoreError::AlreadyExists(_) => 409,
        FileStoreError::NotFound(_) => 404,
        FileStoreError::InvalidName(_) => 400,
        FileStoreError::Io(_) => 500,
    }
}
