mod error;
mod http_mapping;
mod traits;

pub use error::{duplicate_field_message, RepositoryError, Result, StoreError};
pub use http_mapping::{repository_error_to_status_code, store_error_to_status_code};
pub use traits::ResourceRepository;
