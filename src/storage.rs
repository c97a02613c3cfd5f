//! Key-value persistence adapters.
//!
//! The task store talks to durable storage through the [`KeyValueStorage`]
//! trait: string values under string keys, with absence distinct from
//! failure. [`FileStorage`] is the real adapter (one file per key under a
//! root directory); [`MemoryStorage`] backs tests and ephemeral runs.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored value could not be read.
    #[error("storage read failed: {0}")]
    Read(#[source] io::Error),
    /// The value could not be written.
    #[error("storage write failed: {0}")]
    Write(#[source] io::Error),
}

/// Durable string store keyed by name.
pub trait KeyValueStorage {
    /// Fetch the value under `key`. `Ok(None)` means nothing has been stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-per-key storage rooted at a directory.
///
/// Key `k` lives in `<root>/k.json`. Writes go through a temp file and a
/// rename so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. The directory must already exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStorage { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .map_err(StorageError::Read)?;
        Ok(Some(buf))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Atomic-ish write via temp + rename.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(StorageError::Write)?;
        f.write_all(value.as_bytes()).map_err(StorageError::Write)?;
        f.flush().map_err(StorageError::Write)?;
        fs::rename(&tmp, &path).map_err(StorageError::Write)
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
