//! Key-value persistence for editor state
//!
//! History, type zones, and the exported game map live in an opaque
//! key-value store as JSON payloads under well-known keys. Writes can fail
//! when the backing storage is full; callers degrade what they retain
//! rather than surfacing the failure.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    /// The write would exceed the store's capacity.
    Full,
    IoError(String),
    SerializeError(String),
    NoDataDir,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Full => write!(f, "store capacity exceeded"),
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            StoreError::NoDataDir => write!(f, "Could not determine data directory"),
        }
    }
}

impl std::error::Error for StoreError {}

/// An opaque key-value store holding serialized editor state.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory store with an optional byte quota. The quota counts key and
/// value lengths, replaced values included, so tests can provoke
/// [`StoreError::Full`] deterministically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map(|v| key.len() + v.len())
                .unwrap_or(0);
            let used = self.used_bytes() - replaced;
            if used + key.len() + value.len() > quota {
                return Err(StoreError::Full);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// One file per key under a data directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform data directory for tileforge.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tileforge", "tileforge")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Open a store at the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::default_dir()
            .map(Self::new)
            .ok_or(StoreError::NoDataDir)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::IoError(e.to_string()))?;
        std::fs::write(self.key_path(key), value).map_err(|e| match e.kind() {
            ErrorKind::StorageFull => StoreError::Full,
            _ => StoreError::IoError(e.to_string()),
        })
    }

    fn remove(&mut self, key: &str) {
        // Removing an absent key is not an error.
        let _ = std::fs::remove_file(self.key_path(key));
    }
}
