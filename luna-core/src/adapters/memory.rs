//! In-memory state store
//!
//! Used for tests and for running without a data directory. Writes can be
//! switched to fail to exercise the "persistence failed" paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::ports::StateStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::storage("storage is not writable"))
        } else {
            Ok(())
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        let mut values = self
            .values
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        values.remove(key);
        Ok(())
    }
}
