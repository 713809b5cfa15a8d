use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{KeyValueStore, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: BTreeMap<String, String>,
}

/// Key-value store backed by a single JSON document on disk.
///
/// Reads are served from memory; every mutation rewrites the whole document
/// via a temp file in the same directory followed by a rename, so readers
/// never observe a half-written file. A failed write still leaves the
/// in-memory entry updated.
pub struct JsonFileStore {
    file_path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// or malformed file is moved aside to `<path>.corrupt` and the store
    /// starts empty, so a damaged file never keeps the login page down.
    pub fn load_or_create(path: &Path) -> Self {
        let entries = if path.exists() {
            match read_entries(path) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "Discarding unreadable login guard store {}: {}",
                        path.display(),
                        e
                    );
                    set_aside(path);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        JsonFileStore {
            file_path: path.to_path_buf(),
            entries: Mutex::new(entries),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let file = StoreFile {
            entries: entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let dir = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.file_path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let content = std::fs::read_to_string(path)?;
    let file: StoreFile = serde_json::from_str(&content)?;
    Ok(file.entries)
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".corrupt");
    PathBuf::from(backup)
}

fn set_aside(path: &Path) {
    let backup = corrupt_path(path);
    if let Err(e) = std::fs::rename(path, &backup) {
        tracing::warn!("Failed to move {} aside: {}", path.display(), e);
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn temp_store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("login_guard.json")
    }

    #[test]
    fn test_load_or_create_new() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::load_or_create(&temp_store_path(&dir));
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_persistence() {
        let dir = TempDir::new().unwrap();
        let path = temp_store_path(&dir);
        {
            let store = JsonFileStore::load_or_create(&path);
            store.set("login_guard:admin", "{\"failure_count\":3}").unwrap();
        }
        let store2 = JsonFileStore::load_or_create(&path);
        assert_eq!(
            store2.get("login_guard:admin").unwrap().as_deref(),
            Some("{\"failure_count\":3}")
        );
    }

    #[test]
    fn test_remove_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = temp_store_path(&dir);
        let store = JsonFileStore::load_or_create(&path);
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();

        let reloaded = JsonFileStore::load_or_create(&path);
        assert_eq!(reloaded.get("k").unwrap(), None);
    }

    #[test]
    fn test_truncated_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = temp_store_path(&dir);
        fs::write(&path, r#"{"entries":{"login_guard:admin":"#).unwrap();

        let store = JsonFileStore::load_or_create(&path);
        assert_eq!(store.get("login_guard:admin").unwrap(), None);
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(corrupt_path(&path)).unwrap(),
            r#"{"entries":{"login_guard:admin":"#
        );

        store.set("k", "v").unwrap();
        let reloaded = JsonFileStore::load_or_create(&path);
        assert_eq!(reloaded.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_failed_write_keeps_memory_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("login_guard.json");
        let store = JsonFileStore::load_or_create(&path);

        let err = store.set("k", "v").err().unwrap();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
