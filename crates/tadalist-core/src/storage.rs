//! Key-value blob storage.
//!
//! Persistence is deliberately dumb: the entire group collection is one JSON
//! blob under one fixed key, read once at startup and rewritten after every
//! mutation. [`BlobStore`] is the seam; [`FileBlobStore`] keeps one file per
//! key under the data directory, [`MemoryBlobStore`] backs tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// Returns `~/.config/tadalist[-dev]/` based on TADALIST_ENV.
///
/// Set TADALIST_ENV=dev to use a development data directory, or
/// TADALIST_DATA_DIR to override the location outright.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = if let Ok(custom) = std::env::var("TADALIST_DATA_DIR") {
        PathBuf::from(custom)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("TADALIST_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("tadalist-dev")
        } else {
            base_dir.join("tadalist")
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Key-value blob store seam.
///
/// `get` returns `None` for a key that has never been written; any other
/// failure surfaces as an error for the caller to handle (the store layer
/// treats read failures as an empty collection and logs write failures).
pub trait BlobStore {
    /// Read the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous blob.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed blob store: one JSON file per key in the data directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open the store rooted at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Open a store rooted at an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| StorageError::WriteFailed { path, source })
    }
}

/// In-memory blob store for tests and embedding.
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what the store persisted. `fail_writes` makes every `set` fail,
/// exercising the write-failure-is-not-fatal path.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
            fail_writes: true,
        }
    }

    /// Seed a key before handing the store to a consumer.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), value.to_string());
        }
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let blobs = self
            .blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed {
                path: PathBuf::from(key),
                source: std::io::Error::new(std::io::ErrorKind::Other, "writes disabled"),
            });
        }
        let mut blobs = self
            .blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
