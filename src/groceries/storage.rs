//! Blob persistence for the item list
//!
//! The whole collection lives in one key-value slot as a JSON array.
//! Failures here are logged and swallowed: a broken store must never take
//! the list screen down with it.

use super::store::Item;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage slot holding the serialized item list
pub const STORAGE_KEY: &str = "@grocery_list_items";

/// String-keyed storage with whole-value reads and writes
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the user's data directory (~/.local/share/basket)
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("basket");
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .trim_start_matches('@')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.dir))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {:?}", path))
    }
}

/// Restore the list from storage. Missing, unreadable or corrupt blobs all
/// yield an empty list.
pub fn load_items(store: &dyn BlobStore) -> Vec<Item> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::error!("Failed to load items from storage: {:#}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Item>>(&raw) {
        Ok(items) => {
            tracing::debug!(count = items.len(), "restored items from storage");
            items
        }
        Err(e) => {
            tracing::error!("Failed to parse stored items: {}", e);
            Vec::new()
        }
    }
}

/// Overwrite the stored blob with the full list
pub fn save_items(store: &dyn BlobStore, items: &[Item]) {
    let result = serde_json::to_string(items)
        .context("Failed to serialize items")
        .and_then(|json| store.set(STORAGE_KEY, &json));

    if let Err(e) = result {
        tracing::error!("Failed to save items to storage: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        slots: RefCell<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl BlobStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.slots.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                anyhow::bail!("disk full");
            }
            self.slots.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            Item {
                id: "1700000000000".to_string(),
                text: "Avocados".to_string(),
                is_completed: false,
            },
            Item {
                id: "1700000000001".to_string(),
                text: "Limes \"fresh\"".to_string(),
                is_completed: true,
            },
        ]
    }

    #[test]
    fn test_round_trip_through_store() {
        let store = MemoryStore::default();
        save_items(&store, &sample());
        assert_eq!(load_items(&store), sample());
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let store = MemoryStore::default();
        save_items(&store, &sample()[..1]);
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":"1700000000000","text":"Avocados","isCompleted":false}]"#
        );
    }

    #[test]
    fn test_missing_blob_is_empty() {
        assert!(load_items(&MemoryStore::default()).is_empty());
    }

    #[test]
    fn test_corrupt_blob_is_empty() {
        let store = MemoryStore::default();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(load_items(&store).is_empty());
    }

    #[test]
    fn test_failed_write_is_swallowed() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        save_items(&store, &sample());
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(tmp.path().join("nested"));
        assert!(store.get(STORAGE_KEY).unwrap().is_none());

        save_items(&store, &sample());
        assert!(tmp.path().join("nested").join("grocery_list_items.json").exists());
        assert_eq!(load_items(&store), sample());

        save_items(&store, &[]);
        assert!(load_items(&store).is_empty());
    }
}
