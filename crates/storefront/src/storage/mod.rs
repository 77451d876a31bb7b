//! Persistent key-value storage for cart state.
//!
//! The cart and the order counter live in a flat string-keyed store, the way a
//! browser keeps them in local storage. The [`KeyValueStore`] trait is the only
//! contract the rest of the crate relies on:
//!
//! - no atomicity across keys and no transactions
//! - no notification when another writer changes a key
//! - concurrent writers race with last-writer-wins semantics
//!
//! # Adapters
//!
//! - [`MemoryStore`] - process-local, for tests and throwaway sessions
//! - [`JsonFileStore`] - a single JSON document on disk, shared by every
//!   process pointed at the same data directory

mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage keys used by the storefront.
pub mod keys {
    /// Key for the serialized cart entries.
    pub const CART: &str = "cart";

    /// Key for the last issued order sequence number.
    pub const ORDER_SEQUENCE: &str = "order_sequence";
}

/// Errors raised by storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("invalid value under '{key}': {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Opaque get/set/remove over string values.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal cannot be written.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}
