//! Cache key naming.
//!
//! Keys are shared with other deployments of the service reading the same
//! cache, so their shape must not change.

/// Default time-to-live for cache entries, in seconds.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 3600;

/// Prefix shared by every cached resource listing.
const RESOURCES_PAGE_PREFIX: &str = "resources_and_pagination";

/// Pattern matching every cached resource listing, whatever its parameters.
pub const RESOURCES_PAGE_PATTERN: &str = "resources_and_pagination*";

/// Returns the cache key for a single resource.
pub fn resource_key(id: i64) -> String {
    format!("resource-{id}")
}

/// Returns the cache key for one page of resources.
///
/// The name filter is embedded verbatim; an unfiltered listing ends with a
/// trailing `-`.
///
/// # Examples
///
/// ```
/// use ipvault_core::cache::resources_page_key;
///
/// assert_eq!(resources_page_key(2, 10, ""), "resources_and_pagination-2-10-");
/// assert_eq!(resources_page_key(1, 5, "web"), "resources_and_pagination-1-5-web");
/// ```
pub fn resources_page_key(page: u32, page_size: u32, name_filter: &str) -> String {
    format!("{RESOURCES_PAGE_PREFIX}-{page}-{page_size}-{name_filter}")
}
