use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;

use super::traits::KeyValueStore;

/// In-process store. Used as the test double and for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().map(|e| e.contains_key(key)).unwrap_or(false)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
