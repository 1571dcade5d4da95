//! MediaGuard Storage Library
//!
//! This crate provides the storage abstraction the moderation workflow runs against,
//! with a Google Cloud Storage backend and a local filesystem backend.
//!
//! # Storage key format
//!
//! Keys are bucket-relative object paths, exactly as carried by upload notifications
//! (e.g. `photos/a.jpg`). Keys must not be empty, start with `/`, or contain `.`/`..`
//! segments; the `keys` module enforces this for every backend.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-gcs")]
pub mod gcs;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-gcs")]
pub use gcs::GcsStorage;
pub use keys::validate_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediaguard_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
