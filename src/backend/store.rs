//! File-backed local store
//!
//! Each key is a JSON array in `<dir>/<key>.json`. Appends rewrite the file
//! through a temporary sibling and a rename, under a process-wide lock.

use super::traits::LocalStore;
use crate::error::StoreError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct FileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_value(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl LocalStore for FileStore {
    fn append(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut list = match self.read_value(key)? {
            Some(Value::Array(list)) => list,
            Some(_) => return Err(StoreError::Corrupt(key.to_string())),
            None => Vec::new(),
        };
        list.push(value);

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&list)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_value(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_read_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.read("offlineForms").unwrap().is_none());
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.append("offlineForms", json!({"n": 1})).unwrap();
        store.append("offlineForms", json!({"n": 2})).unwrap();
        assert_eq!(
            store.read("offlineForms").unwrap(),
            Some(json!([{"n": 1}, {"n": 2}]))
        );
    }

    #[test]
    fn test_append_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("mne");
        let store = FileStore::new(&nested);
        store.append("offlineForms", json!("x")).unwrap();
        assert!(nested.join("offlineForms.json").exists());
        assert!(!nested.join("offlineForms.json.tmp").exists());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).append("k", json!(1)).unwrap();
        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.read("k").unwrap(), Some(json!([1])));
    }

    #[test]
    fn test_append_to_non_list_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("k.json"), "{\"not\": \"a list\"}").unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.append("k", json!(1)), Err(StoreError::Corrupt(key)) if key == "k"));
    }

    #[test]
    fn test_unparseable_file_is_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("k.json"), "not json").unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.read("k"), Err(StoreError::Serde(_))));
    }

    #[test]
    fn test_keys_are_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.append("a", json!(1)).unwrap();
        store.append("b", json!(2)).unwrap();
        assert_eq!(store.read("a").unwrap(), Some(json!([1])));
        assert_eq!(store.read("b").unwrap(), Some(json!([2])));
        assert_eq!(store.dir(), dir.path());
    }
}
