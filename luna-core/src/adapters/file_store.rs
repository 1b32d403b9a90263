//! JSON file state store
//!
//! Persists client state as a flat JSON object in `state.json`:
//! ```json
//! { "user_token": "...", "onboarding_done": "true" }
//! ```
//! Every read-modify-write holds an exclusive lock on `state.lock`, and the
//! new content is written to a temp file and renamed into place so a crash
//! never leaves a half-written file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::ports::StateStore;

const STATE_FILE: &str = "state.json";
const LOCK_FILE: &str = "state.lock";

/// File-backed `StateStore`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Store rooted in the luna data directory
    pub fn new(luna_dir: &Path) -> Self {
        Self {
            path: luna_dir.join(STATE_FILE),
            lock_path: luna_dir.join(LOCK_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| Error::storage(format!("Failed to open {:?}: {}", self.lock_path, e)))?;
        file.lock_exclusive()
            .map_err(|e| Error::storage(format!("Failed to lock state file: {}", e)))?;
        Ok(file)
    }

    /// Missing or unreadable content is treated as empty state
    fn read_map(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(map)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, content)
            .map_err(|e| Error::storage(format!("Failed to write {:?}: {}", tmp_path, e)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| Error::storage(format!("Failed to replace {:?}: {}", self.path, e)))?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let lock = self.lock()?;
        let mut map = self.read_map();
        apply(&mut map);
        let result = self.write_map(&map);
        let _ = FileExt::unlock(&lock);
        result
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.lock()?;
        let value = self.read_map().get(key).cloned();
        let _ = FileExt::unlock(&lock);
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            map.remove(key);
        })
    }
}
