//! Key-value storage backends for persisted cart state.
//!
//! The cart persists exactly one record, but the backend contract is a plain
//! string key-value store so the same trait can sit in front of a device's
//! local storage, a directory of files, or an in-memory map in tests.
//!
//! # Backends
//!
//! - [`FileStore`] - one file per key under a root directory
//! - [`MemoryStore`] - shared in-process map with write-failure injection

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Asynchronous string key-value store.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`); writes run on
///   spawned tasks
/// - `get_item` returns `Ok(None)` for a key that was never written
/// - `set_item` replaces any previous value in full
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value stored under `key`.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
