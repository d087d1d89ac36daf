//! Functional core for ipvault.
//!
//! Pure domain types, validation, cache key naming, glob matching,
//! serialization and the traits that the imperative shell implements.
//! Nothing in this crate performs I/O.

pub mod cache;
pub mod files;
pub mod resource;
pub mod storage;
