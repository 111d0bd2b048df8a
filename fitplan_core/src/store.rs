//! Key-value persistence for JSON blobs.
//!
//! Reads never fail: a missing, unreadable, unlockable or corrupt entry is
//! reported as absent. Writes return errors, and callers on the interactive
//! paths log and drop them (see [`crate::user_data`]).

use crate::{Error, Result};
use fs2::FileExt;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// String-keyed store of JSON values
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&mut self, key: &str, value: &Value) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Keys double as file names, so only a conservative alphabet is accepted
fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::Store(format!("Invalid store key '{}'", key)))
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// One `<key>.json` file per key under a root directory
///
/// Reads take a shared lock; writes go to a locked temp file that is synced
/// and renamed over the target.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn read_locked(path: &Path) -> std::io::Result<String> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        read?;
        Ok(contents)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = match self.path_for(key) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("{}", e);
                return None;
            }
        };

        if !path.exists() {
            tracing::debug!("No stored entry for '{}'", key);
            return None;
        }

        let contents = match Self::read_locked(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Unable to read {:?}: {}. Treating as absent.", path, e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded '{}' from {:?}", key, path);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Treating as absent.", path, e);
                None
            }
        }
    }

    fn put(&mut self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root)?;

        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(&self.root)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, value)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved '{}' to {:?}", key, path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &Value) -> Result<()> {
        check_key(key)?;
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path().join("user"));

        store.put("plan", &json!({"days": [1, 2, 3]})).unwrap();
        assert_eq!(store.get("plan"), Some(json!({"days": [1, 2, 3]})));
        assert!(temp_dir.path().join("user/plan.json").exists());
    }

    #[test]
    fn test_missing_key_is_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());
        assert_eq!(store.get("profile"), None);
    }

    #[test]
    fn test_corrupt_entry_is_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("completed.json"), "{ invalid json }").unwrap();

        let store = JsonFileStore::new(temp_dir.path());
        assert_eq!(store.get("completed"), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        assert!(store.put("../escape", &json!(1)).is_err());
        assert!(store.put("", &json!(1)).is_err());
        assert_eq!(store.get("../escape"), None);
    }

    #[test]
    fn test_put_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());
        store.put("profile", &json!({"age": 30})).unwrap();
        store.put("profile", &json!({"age": 31})).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "profile.json")
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
        assert_eq!(store.get("profile"), Some(json!({"age": 31})));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());
        store.put("plan", &json!([])).unwrap();

        store.remove("plan").unwrap();
        store.remove("plan").unwrap();
        assert_eq!(store.get("plan"), None);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.put("a", &json!(true)).unwrap();
        assert_eq!(store.get("a"), Some(json!(true)));
        assert_eq!(store.len(), 1);
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }
}
