//! Key-value persistence.
//!
//! One serialized text record per key, behind a trait so the state
//! containers can be handed an in-memory fake in tests instead of a
//! hidden module-level singleton.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write record '{key}': {source}")]
    WriteError {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create storage directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// String records under distinct keys.
///
/// Reads are infallible by contract: a missing or unreadable record is
/// `None` and the caller decides how to degrade.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// On-disk store: one file per key under a base directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::CreateDirError {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    /// Default location under the platform data directory.
    ///
    /// Falls back to the current directory if the data dir is unavailable.
    pub fn default_dir() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("giftlink")
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read storage record");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.record_path(key), value).map_err(|e| StorageError::WriteError {
            key: key.to_string(),
            source: e,
        })
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.records
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
