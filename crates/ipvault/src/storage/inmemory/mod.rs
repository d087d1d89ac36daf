//! In-memory storage backend.
//!
//! Stores resources in a `BTreeMap` wrapped in `Arc<RwLock<_>>`, so listings
//! come out in id order. Useful for tests and local development where
//! persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use ipvault::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
