//! Key-value stores holding JSON values
//!
//! Values are kept as `serde_json::Value` so readers can cope with older
//! shapes of the same key instead of failing on a strict type.

use crate::error::{StorageError, StorageResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tempfile::NamedTempFile;

/// A persistent string-keyed store of JSON values
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for a key, or `None` if it was never written
    fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    fn set(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and sessions that must not touch disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let values = self.values.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let mut values = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
///
/// Every operation re-reads the file, so several handles (or processes)
/// on the same file each see the others' keys. Writes replace the whole
/// file through a temp file and rename, so a crash mid-write leaves the
/// previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// File name used inside a data directory
    pub const FILE_NAME: &'static str = "store.json";

    /// Opens the store in a data directory, creating it on first write
    pub fn open_in(data_dir: &Path) -> StorageResult<Self> {
        Self::open(data_dir.join(Self::FILE_NAME))
    }

    /// Opens a store file
    ///
    /// An unreadable file is moved aside to `<name>.corrupt` and the store
    /// starts empty rather than refusing to run.
    pub fn open(path: PathBuf) -> StorageResult<Self> {
        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        let values = store.read_values()?;

        log::debug!(
            "Opened store at {} with {} keys",
            store.path.display(),
            values.len()
        );
        Ok(store)
    }

    fn read_values(&self) -> StorageResult<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        Ok(Self::parse(&self.path, &contents))
    }

    fn parse(path: &Path, contents: &str) -> Map<String, Value> {
        if contents.trim().is_empty() {
            return Map::new();
        }

        match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                let aside = path.with_extension("json.corrupt");
                log::warn!(
                    "Store at {} is unreadable, moving it to {} and starting empty",
                    path.display(),
                    aside.display()
                );
                if let Err(e) = fs::rename(path, &aside) {
                    log::error!("Failed to move corrupt store aside: {}", e);
                }
                Map::new()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Map<String, Value>) -> StorageResult<()> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(write_err)?;

        let contents = serde_json::to_vec_pretty(values).map_err(|e| StorageError::Encode {
            key: "*".to_string(),
            source: e,
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(&contents).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.read_values()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut values = self.read_values()?;
        values.insert(key.to_string(), value);
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut values = self.read_values()?;
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup_file_store() -> (TempDir, JsonFileStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open_in(temp_dir.path()).expect("Failed to open store");
        (temp_dir, store)
    }

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.get("lastRead").unwrap(), None);

        store.set("lastRead", json!({"chapterId": 1})).unwrap();
        assert_eq!(store.get("lastRead").unwrap(), Some(json!({"chapterId": 1})));

        store.remove("lastRead").unwrap();
        store.remove("lastRead").unwrap();
        assert_eq!(store.get("lastRead").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let (temp_dir, store) = setup_file_store();
        store.set("lastRead", json!({"chapterId": 2, "localIndex": 5})).unwrap();
        drop(store);

        let reopened = JsonFileStore::open_in(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get("lastRead").unwrap(),
            Some(json!({"chapterId": 2, "localIndex": 5}))
        );
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open_in(&temp_dir.path().join("nested").join("dir")).unwrap();
        assert!(!store.path().exists());

        store.set("k", json!(1)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_store_remove_persists() {
        let (temp_dir, store) = setup_file_store();
        store.set("a", json!(1)).unwrap();
        store.set("b", json!(2)).unwrap();
        store.remove("a").unwrap();
        drop(store);

        let reopened = JsonFileStore::open_in(temp_dir.path()).unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_corrupt_file_moved_aside() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(JsonFileStore::FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(path.clone()).unwrap();
        assert_eq!(store.get("lastRead").unwrap(), None);
        assert!(path.with_extension("json.corrupt").exists());
    }

    #[test]
    fn test_non_object_root_treated_as_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(JsonFileStore::FILE_NAME);
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::open(path).unwrap();
        assert_eq!(store.get("0").unwrap(), None);
    }

    #[test]
    fn test_file_store_sees_other_handle_writes() {
        let (temp_dir, first) = setup_file_store();
        let second = JsonFileStore::open_in(temp_dir.path()).unwrap();

        second.set("bookmarks", json!(["1-1"])).unwrap();
        assert_eq!(first.get("bookmarks").unwrap(), Some(json!(["1-1"])));

        first.set("lastRead", json!({"chapterId": 1, "localIndex": 2})).unwrap();
        second.remove("missing").unwrap();
        assert_eq!(second.get("bookmarks").unwrap(), Some(json!(["1-1"])));
        assert!(second.get("lastRead").unwrap().is_some());
    }

    #[test]
    fn test_arc_store_shares_values() {
        let store = Arc::new(MemoryStore::new());
        let other = Arc::clone(&store);

        store.set("bookmarks", json!([])).unwrap();
        assert_eq!(other.get("bookmarks").unwrap(), Some(json!([])));
    }
}
