//! Storage error handling
//!
//! Provides typed errors for backend operations with descriptive messages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in a key-value backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Failed to read the snapshot file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the snapshot file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot file exists but cannot be parsed
    #[error("Snapshot at '{path}' is corrupted: {details}")]
    CorruptSnapshot { path: PathBuf, details: String },

    /// Snapshot encoding failed
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// A string operation hit a hash entry or vice versa
    #[error("Key '{key}' holds a value of the wrong kind for this operation")]
    WrongKind { key: String },

    /// A previous panic poisoned the backend lock
    #[error("Backend lock poisoned")]
    LockPoisoned,
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_kind_display() {
        let err = BackendError::WrongKind {
            key: "spesa:lista:ABCDEF".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("spesa:lista:ABCDEF"));
        assert!(msg.contains("wrong kind"));
    }

    #[test]
    fn test_read_error_display() {
        let err = BackendError::ReadError {
            path: PathBuf::from("/data/spesa.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/spesa.json"));
    }
}
