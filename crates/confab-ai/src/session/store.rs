//! Key-value persistence for conversation logs.
//!
//! The session serializes its whole log as one blob under a single
//! well-known key. Reads are infallible by contract: missing or
//! unreadable data is reported as absent and the session starts empty.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

/// Error raised by a store write. Persistence is best-effort; the
/// session logs these and carries on.
#[derive(Debug, thiserror::Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

pub trait LogStore: Send + Sync {
    /// Fetch the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: LogStore + ?Sized> LogStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// File-backed store: one file per key inside a directory.
///
/// Not safe for multiple concurrent writers on the same directory;
/// single-writer per key is assumed (single-user client).
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform default data directory, e.g. `~/.local/share/confab`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("confab"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LogStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(blob) => Some(blob),
            Err(e) => {
                debug!("no stored blob at {}: {e}", path.display());
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError(format!("create {}: {e}", self.dir.display())))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| StoreError(format!("write {}: {e}", path.display())))
    }
}

/// In-memory store for tests and ephemeral (`--no-persist`) runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("messages").is_none());
        store.set("messages", "[1,2]").unwrap();
        assert_eq!(store.get("messages").as_deref(), Some("[1,2]"));

        store.set("messages", "[]").unwrap();
        assert_eq!(store.get("messages").as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("deeper"));
        store.set("messages", "x").unwrap();
        assert_eq!(store.get("messages").as_deref(), Some("x"));
    }

    #[test]
    fn file_store_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.get("messages").is_none());
        store.set("messages", "[]").unwrap();
        assert_eq!(store.get("messages").as_deref(), Some("[]"));
    }
}
