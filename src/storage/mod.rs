//! Durable key-value storage
//!
//! Both the response cache and the preferences store sit on top of a
//! [`KeyValueStore`]: an asynchronous map from string keys to string values.
//! [`FileStore`] keeps one file per key under the application data directory;
//! [`MemoryStore`] keeps everything in process and is used by tests.

mod file;
mod memory;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub use file::{default_data_dir, FileStore};
pub use memory::MemoryStore;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No home directory, so no default data directory either
    #[error("Could not determine a data directory for esimstore")]
    NoDataDir,
}

/// Asynchronous string key-value store
///
/// Keys are logically independent: there are no cross-key transactions and
/// concurrent writes to the same key are last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
