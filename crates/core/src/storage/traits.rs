use std::sync::Arc;

use crate::errors::CoreError;

/// Byte-oriented key-value persistence used by the prediction history.
///
/// Each call is atomic from the caller's point of view. Implementations
/// report failures; callers decide whether to recover.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key)
    }
}
