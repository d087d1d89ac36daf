//! Directory-backed file store with per-name locking.

mod store;

pub use store::FileStore;
