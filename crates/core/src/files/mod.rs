//! Pure pieces of the locked file store: errors and name validation.

mod error;
mod names;

pub use error::{file_store_error_to_status_code, FileStoreError, Result};
pub use names::validate_file_name;
