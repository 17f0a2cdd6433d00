//! crates/manga_diary_core/src/store.rs
//!
//! An in-memory `KeyValueStore`, used for ephemeral sessions and in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::{KeyValueStore, PortError, PortResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
