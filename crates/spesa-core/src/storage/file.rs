//! File-backed backend
//!
//! Persists the whole key space as one JSON snapshot. Every operation reads
//! the snapshot, transforms it, and writes it back atomically (write to a
//! temp file, sync, then rename), so the file is never left half-written.
//!
//! This is the local equivalent of the hosted key-value store: the same
//! last-write-wins semantics, just on disk.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{BackendError, BackendResult, KeyValueBackend};

/// A persisted entry: plain string or counter hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Text(String),
    Hash(BTreeMap<String, i64>),
}

type Snapshot = BTreeMap<String, StoredEntry>;

/// Key-value backend persisted to a single JSON file
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Create a backend storing its snapshot at `path`
    ///
    /// The file is created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BackendResult<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| BackendError::ReadError {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|err| BackendError::CorruptSnapshot {
            path: self.path.clone(),
            details: err.to_string(),
        })
    }

    fn save(&self, snapshot: &Snapshot) -> BackendResult<()> {
        let content = serde_json::to_string_pretty(snapshot)?;
        atomic_write(&self.path, content.as_bytes())
    }

    fn with_snapshot<T>(
        &self,
        apply: impl FnOnce(&mut Snapshot) -> BackendResult<(T, bool)>,
    ) -> BackendResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BackendError::LockPoisoned)?;
        let mut snapshot = self.load()?;
        let (result, dirty) = apply(&mut snapshot)?;
        if dirty {
            self.save(&snapshot)?;
        }
        Ok(result)
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> BackendResult<Option<String>> {
        self.with_snapshot(|snapshot| match snapshot.get(key) {
            None => Ok((None, false)),
            Some(StoredEntry::Text(value)) => Ok((Some(value.clone()), false)),
            Some(StoredEntry::Hash(_)) => Err(BackendError::WrongKind {
                key: key.to_string(),
            }),
        })
    }

    fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        self.with_snapshot(|snapshot| {
            snapshot.insert(key.to_string(), StoredEntry::Text(value.to_string()));
            Ok(((), true))
        })
    }

    fn exists(&self, key: &str) -> BackendResult<bool> {
        self.with_snapshot(|snapshot| Ok((snapshot.contains_key(key), false)))
    }

    fn hash_increment(&self, key: &str, field: &str, delta: i64) -> BackendResult<()> {
        self.with_snapshot(|snapshot| {
            match snapshot
                .entry(key.to_string())
                .or_insert_with(|| StoredEntry::Hash(BTreeMap::new()))
            {
                StoredEntry::Hash(hash) => {
                    *hash.entry(field.to_string()).or_insert(0) += delta;
                    Ok(((), true))
                }
                StoredEntry::Text(_) => Err(BackendError::WrongKind {
                    key: key.to_string(),
                }),
            }
        })
    }

    fn hash_get_all(&self, key: &str) -> BackendResult<Option<HashMap<String, i64>>> {
        self.with_snapshot(|snapshot| match snapshot.get(key) {
            None => Ok((None, false)),
            Some(StoredEntry::Hash(hash)) => {
                let map = hash.iter().map(|(k, v)| (k.clone(), *v)).collect();
                Ok((Some(map), false))
            }
            Some(StoredEntry::Text(_)) => Err(BackendError::WrongKind {
                key: key.to_string(),
            }),
        })
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> BackendResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BackendError::WriteError {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|source| BackendError::WriteError {
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(data).map_err(|source| BackendError::WriteError {
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| BackendError::WriteError {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| BackendError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
