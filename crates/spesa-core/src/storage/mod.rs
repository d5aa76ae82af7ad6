//! Key-value storage backends
//!
//! All list and history state lives behind the [`KeyValueBackend`] trait:
//! string values per key plus a counter-hash per key, mirroring the Redis
//! subset the app needs (`GET`/`SET`/`EXISTS`/`HINCRBY`/`HGETALL`).
//!
//! Two implementations are provided:
//! - [`MemoryBackend`]: an injected in-process map for tests and development
//! - [`FileBackend`]: a JSON snapshot on disk with atomic writes
//!
//! Individual `get`/`set` calls are atomic per key, but the store layer's
//! read-modify-write pairs are not; concurrent writers race and the last
//! full write wins.

mod error;
mod file;
mod memory;

use std::collections::HashMap;

pub use error::{BackendError, BackendResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Abstract persistent key-value store
///
/// Keys are namespaced strings (see `ListCode::list_key`). Plain values are
/// opaque strings (the store layer keeps JSON in them); hash values map
/// string fields to integer counters.
pub trait KeyValueBackend: Send + Sync {
    /// Get the string value at `key`, or `None` if absent
    fn get(&self, key: &str) -> BackendResult<Option<String>>;

    /// Set the string value at `key`, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> BackendResult<()>;

    /// Check whether `key` has an entry (string or hash)
    fn exists(&self, key: &str) -> BackendResult<bool>;

    /// Increment `field` in the hash at `key` by `delta`, creating the hash
    /// and the field as needed
    fn hash_increment(&self, key: &str, field: &str, delta: i64) -> BackendResult<()>;

    /// Get all fields of the hash at `key`, or `None` if absent
    fn hash_get_all(&self, key: &str) -> BackendResult<Option<HashMap<String, i64>>>;
}
