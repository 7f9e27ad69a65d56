//! Local storage
//!
//! String key/value store with the DOM Storage surface. The whole store can
//! be marked unavailable to model disabled storage; every access then
//! reports [`StorageError::Unavailable`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Storage access failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
}

#[derive(Debug, Default)]
struct StorageInner {
    data: HashMap<String, String>,
    disabled: bool,
}

/// Shared local-storage handle
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    inner: Arc<Mutex<StorageInner>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get item
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.lock().unwrap();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(inner.data.get(key).cloned())
    }

    /// Set item
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        inner.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove item
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        inner.data.remove(key);
        Ok(())
    }

    /// Clear all items
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        inner.data.clear();
        Ok(())
    }

    /// Number of stored items
    pub fn length(&self) -> Result<usize, StorageError> {
        let inner = self.inner.lock().unwrap();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(inner.data.len())
    }

    /// Toggle availability
    pub fn set_available(&self, available: bool) {
        self.inner.lock().unwrap().disabled = !available;
    }

    pub fn is_available(&self) -> bool {
        !self.inner.lock().unwrap().disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_roundtrip() {
        let storage = LocalStorage::new();

        storage.set_item("key1", "value1").unwrap();
        assert_eq!(storage.get_item("key1").unwrap().as_deref(), Some("value1"));

        storage.set_item("key2", "value2").unwrap();
        assert_eq!(storage.length().unwrap(), 2);

        storage.remove_item("key1").unwrap();
        assert_eq!(storage.get_item("key1").unwrap(), None);

        storage.clear().unwrap();
        assert_eq!(storage.length().unwrap(), 0);
    }

    #[test]
    fn test_unavailable_storage_errors_everywhere() {
        let storage = LocalStorage::new();
        storage.set_item("kept", "1").unwrap();
        storage.set_available(false);

        assert_eq!(storage.get_item("kept"), Err(StorageError::Unavailable));
        assert_eq!(storage.set_item("k", "v"), Err(StorageError::Unavailable));
        assert_eq!(storage.remove_item("kept"), Err(StorageError::Unavailable));
        assert_eq!(storage.length(), Err(StorageError::Unavailable));

        storage.set_available(true);
        assert_eq!(storage.get_item("kept").unwrap().as_deref(), Some("1"));
    }
}
