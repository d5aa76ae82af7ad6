//! List registry
//!
//! Mints list codes and answers existence checks. Creating a list writes an
//! empty item collection under the new code's key, so a just-created list
//! is distinguishable from a code nobody has ever used.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::code::ListCode;
use crate::storage::KeyValueBackend;

/// How many freshly generated codes to try before giving up
///
/// With 33^6 possible codes a collision is already unlikely; retrying a few
/// times makes running into one twice in a row effectively impossible.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Creates lists and validates list codes
pub struct ListRegistry {
    backend: Arc<dyn KeyValueBackend>,
}

impl ListRegistry {
    /// Create a registry over the given backend
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Create a new list and return its code
    ///
    /// Generates a random code, skipping any that already exist, and
    /// initializes the list's item collection to empty.
    pub fn create_list(&self) -> Result<ListCode> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = ListCode::generate();
            if self
                .backend
                .exists(&code.list_key())
                .context("Failed to check for code collision")?
            {
                warn!(code = %code, "generated code collides with existing list, retrying");
                continue;
            }
            self.backend
                .set(&code.list_key(), "[]")
                .with_context(|| format!("Failed to initialize list {}", code))?;
            info!(code = %code, "created list");
            return Ok(code);
        }
        bail!("Could not generate an unused list code after {MAX_CODE_ATTEMPTS} attempts");
    }

    /// Check whether a list exists (possibly empty) for this code
    pub fn list_exists(&self, code: &ListCode) -> Result<bool> {
        self.backend
            .exists(&code.list_key())
            .with_context(|| format!("Failed to check existence of list {}", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn registry() -> ListRegistry {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(MemoryBackend::new());
        ListRegistry::new(backend)
    }

    #[test]
    fn test_create_list_returns_valid_code() {
        let registry = registry();
        let code = registry.create_list().unwrap();
        assert_eq!(code.as_str().len(), 6);
    }

    #[test]
    fn test_created_list_exists_and_is_empty() {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(MemoryBackend::new());
        let registry = ListRegistry::new(Arc::clone(&backend));

        let code = registry.create_list().unwrap();
        assert!(registry.list_exists(&code).unwrap());
        assert_eq!(backend.get(&code.list_key()).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_unknown_code_does_not_exist() {
        let registry = registry();
        let code = ListCode::parse("ZZZZZZ").unwrap();
        assert!(!registry.list_exists(&code).unwrap());
    }

    #[test]
    fn test_codes_are_distinct() {
        let registry = registry();
        let a = registry.create_list().unwrap();
        let b = registry.create_list().unwrap();
        assert_ne!(a, b);
    }
}
