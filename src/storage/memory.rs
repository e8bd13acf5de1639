use std::collections::HashMap;
use std::sync::Mutex;

use crate::common::{trace, ErrorKind, Result};
use crate::storage::Storage;

/// Process local medium. Nothing survives the process, which makes it the
/// medium of choice for tests and for front-ends without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    // Upper bound on the sum of key and value bytes.
    quota_bytes: Option<usize>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Default::default()
        }
    }

    /// A medium that rejects every operation, like storage disabled by the
    /// user agent.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the guard cannot leave the map half written.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(ErrorKind::StorageUnavailable.into())
        } else {
            Ok(())
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let mut items = self.lock();

        if let Some(quota_bytes) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested_bytes = others + key.len() + value.len();
            if requested_bytes > quota_bytes {
                return Err(ErrorKind::QuotaExceeded {
                    quota_bytes,
                    requested_bytes,
                }
                .into());
            }
        }

        trace!(key, bytes = value.len(), "Set item");
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn quota_exceeded() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("key", "12345").unwrap();
        // Overwriting the same key only counts the new value.
        storage.set_item("key", "54321").unwrap();

        let err = storage.set_item("key", "123456").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(storage.get_item("key").unwrap().as_deref(), Some("54321"));
    }

    #[test]
    fn unavailable_medium() {
        let storage = MemoryStorage::unavailable();
        assert!(storage.get_item("k").is_err());
        assert!(storage.set_item("k", "v").is_err());
        assert!(storage.remove_item("k").is_err());
    }
}
