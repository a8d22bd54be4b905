#![warn(clippy::unwrap_used)]

//! Persistence port for banner state: raw-string key-value storage with
//! pluggable backends (in-memory, JSON file, no-op).

pub mod file;
pub mod memory;
pub mod noop;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use noop::NoopStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents corrupt: {0}")]
    Corrupt(String),
}

/// Key-value persistence port.
///
/// The port stores raw strings; serialization stays with the caller so the
/// contract carries no encoding dependency. Implementations may fail (a real
/// backing store can always be unavailable); callers decide whether a
/// failure is fatal.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` from storage. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
