//! Filesystem storage backend
//!
//! Stores each key as its own file in an XDG-compliant data directory
//! (`~/.local/share/esimstore/` on Linux). Writes go through a temporary file
//! and a rename so a crash never leaves a half-written record behind.

use async_trait::async_trait;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use super::{KeyValueStore, StorageError};

/// Key-value store that keeps one file per key
#[derive(Debug)]
pub struct FileStore {
    /// Directory where record files are stored
    data_dir: PathBuf,
    /// Suffix counter for temporary files, so concurrent writes never share one
    write_seq: AtomicU64,
}

impl FileStore {
    /// Creates a FileStore in the default data directory
    ///
    /// Fails with [`StorageError::NoDataDir`] when no home directory exists.
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self::with_dir(default_data_dir()?))
    }

    /// Creates a FileStore rooted at a custom directory
    ///
    /// The directory is created lazily on the first write.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_seq: AtomicU64::new(0),
        }
    }

    /// Directory holding the record files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path of the file backing `key`
    fn record_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Default data directory for esimstore
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    ProjectDirs::from("", "", "esimstore")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StorageError::NoDataDir)
}

/// Percent-encodes `%`, control characters and characters that are not valid
/// in file names.
///
/// Cache keys look like `country:v1:fr:en:eur`, so `:` in particular must go.
/// The encoding is reversible, so distinct keys never share a file.
fn sanitize_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '%' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => {
                encoded.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_ascii_control() => encoded.push_str(&format!("%{:02X}", c as u32)),
            c => encoded.push(c),
        }
    }
    encoded
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| io_error(&self.data_dir, e))?;

        let path = self.record_path(key);
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("tmp{}", seq));

        fs::write(&temp_path, value)
            .await
            .map_err(|e| io_error(&temp_path, e))?;
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(&path, e));
        }

        tracing::trace!(key, path = %path.display(), "stored record");
        Ok(())
    }
}
