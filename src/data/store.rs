//! Persistence of the live test.
//!
//! The store is a plain key-value port holding string blobs. [`LiveTest`]
//! keeps the serialized [`TestConfig`] under one fixed key and heals a
//! corrupt entry by removing it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::TestConfig;

/// Key under which the live test is stored.
pub const LIVE_TEST_KEY: &str = "live-test";

/// Key-value storage for serialized blobs.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ConfigStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 content is as good as corrupt.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;

        debug!(path = %path.display(), bytes = blob.len(), "Store entry written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// In-memory store, used by tests and headless callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The live test as seen through a [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct LiveTest<S> {
    store: S,
}

impl<S: ConfigStore> LiveTest<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the live test. A blob that fails to deserialize is removed and
    /// reported as absent.
    pub fn load(&mut self) -> Result<Option<TestConfig>, StoreError> {
        let Some(blob) = self.store.get(LIVE_TEST_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<TestConfig>(&blob) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                warn!(error = %e, "Failed to load live test from store, clearing it");
                self.store.remove(LIVE_TEST_KEY)?;
                Ok(None)
            }
        }
    }

    /// Overwrite the live test.
    pub fn save(&mut self, config: &TestConfig) -> Result<(), StoreError> {
        let blob = serde_json::to_string(config)?;
        self.store.set(LIVE_TEST_KEY, &blob)?;
        info!(
            questions = config.questions().len(),
            time_limit = config.time_limit_minutes(),
            "Live test saved"
        );
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(LIVE_TEST_KEY)?;
        info!("Live test cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn config() -> TestConfig {
        let question = Question::new("q", ["a", "b", "c", "d"].map(String::from), 1).unwrap();
        TestConfig::new(vec![question], 15).unwrap()
    }

    #[test]
    fn test_save_load_clear() {
        let mut live = LiveTest::new(MemoryStore::new());
        assert_eq!(live.load().unwrap(), None);

        live.save(&config()).unwrap();
        assert_eq!(live.load().unwrap(), Some(config()));

        live.clear().unwrap();
        assert_eq!(live.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_blob_is_cleared() {
        let mut store = MemoryStore::new();
        store.set(LIVE_TEST_KEY, "{\"questions\": oops").unwrap();

        let mut live = LiveTest::new(store);
        assert_eq!(live.load().unwrap(), None);
        assert_eq!(live.store().get(LIVE_TEST_KEY).unwrap(), None);
    }

    #[test]
    fn test_blob_breaking_invariants_is_cleared() {
        let mut store = MemoryStore::new();
        store
            .set(LIVE_TEST_KEY, r#"{"questions":[],"timeLimit":10}"#)
            .unwrap();

        let mut live = LiveTest::new(store);
        assert_eq!(live.load().unwrap(), None);
        assert_eq!(live.store().get(LIVE_TEST_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
