//! Redis cache backend implementation.
//!
//! Provides a shared cache for multi-instance deployments, addressed by a
//! connection URL.

mod cache;
mod error;

pub use cache::RedisCache;
