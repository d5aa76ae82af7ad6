//! In-memory backend
//!
//! An explicitly constructed, injected map for tests and local development.
//! Never a process-wide global: each instance owns its own entries, so
//! tests run isolated and in parallel.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{BackendError, BackendResult, KeyValueBackend};

/// A stored entry: plain string or counter hash
#[derive(Debug, Clone)]
enum Entry {
    Text(String),
    Hash(HashMap<String, i64>),
}

/// In-memory key-value backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> BackendResult<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries.lock().map_err(|_| BackendError::LockPoisoned)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Text(value)) => Ok(Some(value.clone())),
            Some(Entry::Hash(_)) => Err(BackendError::WrongKind {
                key: key.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), Entry::Text(value.to_string()));
        Ok(())
    }

    fn exists(&self, key: &str) -> BackendResult<bool> {
        let entries = self.lock()?;
        Ok(entries.contains_key(key))
    }

    fn hash_increment(&self, key: &str, field: &str, delta: i64) -> BackendResult<()> {
        let mut entries = self.lock()?;
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(hash) => {
                *hash.entry(field.to_string()).or_insert(0) += delta;
                Ok(())
            }
            Entry::Text(_) => Err(BackendError::WrongKind {
                key: key.to_string(),
            }),
        }
    }

    fn hash_get_all(&self, key: &str) -> BackendResult<Option<HashMap<String, i64>>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Hash(hash)) => Ok(Some(hash.clone())),
            Some(Entry::Text(_)) => Err(BackendError::WrongKind {
                key: key.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let backend = MemoryBackend::new();
        assert!(backend.get("nope").unwrap().is_none());
        assert!(!backend.exists("nope").unwrap());
    }

    #[test]
    fn test_set_and_get() {
        let backend = MemoryBackend::new();
        backend.set("k", "[]").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("[]"));
        assert!(backend.exists("k").unwrap());
    }

    #[test]
    fn test_set_overwrites() {
        let backend = MemoryBackend::new();
        backend.set("k", "a").unwrap();
        backend.set("k", "b").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_hash_increment_creates_and_accumulates() {
        let backend = MemoryBackend::new();
        backend.hash_increment("h", "milk", 1).unwrap();
        backend.hash_increment("h", "milk", 1).unwrap();
        backend.hash_increment("h", "bread", 1).unwrap();

        let hash = backend.hash_get_all("h").unwrap().unwrap();
        assert_eq!(hash.get("milk"), Some(&2));
        assert_eq!(hash.get("bread"), Some(&1));
    }

    #[test]
    fn test_hash_get_all_missing() {
        let backend = MemoryBackend::new();
        assert!(backend.hash_get_all("h").unwrap().is_none());
    }

    #[test]
    fn test_kind_mismatch() {
        let backend = MemoryBackend::new();
        backend.set("text", "v").unwrap();
        assert!(matches!(
            backend.hash_increment("text", "f", 1),
            Err(BackendError::WrongKind { .. })
        ));

        backend.hash_increment("hash", "f", 1).unwrap();
        assert!(matches!(
            backend.get("hash"),
            Err(BackendError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_instances_are_isolated() {
        let a = MemoryBackend::new();
        let b = MemoryBackend::new();
        a.set("k", "v").unwrap();
        assert!(!b.exists("k").unwrap());
    }
}
