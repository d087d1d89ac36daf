//! Pure functions for encoding domain values into cache payloads and back.
//!
//! Payloads are JSON so that entries written by other deployments of the
//! service, and entries inspected by hand with `redis-cli`, read the same.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::resource::{Resource, ResourcePage};

/// Payload stored for a lookup that found nothing.
pub const NULL_SENTINEL: &[u8] = b"null";

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Outcome of probing the cache for a value.
///
/// `Absent` is a remembered negative result and is distinct from `Miss`,
/// where the cache simply had nothing (or was unreachable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Absent,
    Miss,
}

/// Serializes a resource to JSON bytes.
pub fn encode_resource(resource: &Resource) -> Result<Vec<u8>> {
    serde_json::to_vec(resource).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Serializes a page of resources with its pagination metadata.
pub fn encode_resource_page(page: &ResourcePage) -> Result<Vec<u8>> {
    serde_json::to_vec(page).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Payload recording that a lookup found nothing.
pub fn encode_absent() -> Vec<u8> {
    NULL_SENTINEL.to_vec()
}

/// Interprets a raw cache payload.
///
/// - `None` (nothing stored) becomes [`CacheLookup::Miss`]
/// - the serialized-null sentinel becomes [`CacheLookup::Absent`]
/// - anything else is decoded as `T`
pub fn decode_lookup<T: DeserializeOwned>(bytes: Option<&[u8]>) -> Result<CacheLookup<T>> {
    let Some(bytes) = bytes else {
        return Ok(CacheLookup::Miss);
    };

    if bytes.trim_ascii() == NULL_SENTINEL {
        return Ok(CacheLookup::Absent);
    }

    serde_json::from_slice(bytes)
        .map(CacheLookup::Hit)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
