mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    resource_key, resources_page_key, DEFAULT_EXPIRATION_SECONDS, RESOURCES_PAGE_PATTERN,
};
pub use patterns::pattern_matches;
pub use serialization::{
    decode_lookup, encode_absent, encode_resource, encode_resource_page, CacheLookup,
    SerializationError, NULL_SENTINEL,
};
pub use traits::CacheBackend;
