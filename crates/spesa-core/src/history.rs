//! Purchase-frequency history
//!
//! Every successful addition records the item name (lower-cased) in a
//! per-list counter hash. The counts power "frequent items" suggestions;
//! they are never decremented and never expire.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::code::ListCode;
use crate::models::HistoryEntry;
use crate::storage::KeyValueBackend;

/// Tracks how often item names are added to a list
pub struct HistoryTracker {
    backend: Arc<dyn KeyValueBackend>,
}

impl HistoryTracker {
    /// Create a tracker over the given backend
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Record one mention per name
    ///
    /// Names are keyed lower-cased. The same name appearing multiple times
    /// in one call increments multiple times.
    pub fn track_items(&self, code: &ListCode, names: &[String]) -> Result<()> {
        let key = code.history_key();
        for name in names {
            self.backend
                .hash_increment(&key, &name.to_lowercase(), 1)
                .with_context(|| format!("Failed to track '{}' for list {}", name, code))?;
        }
        debug!(code = %code, count = names.len(), "tracked item mentions");
        Ok(())
    }

    /// All tracked names with counts, most frequent first
    pub fn get_history(&self, code: &ListCode) -> Result<Vec<HistoryEntry>> {
        let raw = self
            .backend
            .hash_get_all(&code.history_key())
            .with_context(|| format!("Failed to read history for list {}", code))?;

        let mut entries: Vec<HistoryEntry> = raw
            .unwrap_or_default()
            .into_iter()
            .map(|(name, count)| HistoryEntry { name, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn tracker() -> (HistoryTracker, ListCode) {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(MemoryBackend::new());
        (HistoryTracker::new(backend), ListCode::generate())
    }

    #[test]
    fn test_empty_history() {
        let (tracker, code) = tracker();
        assert!(tracker.get_history(&code).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_tracking_accumulates() {
        let (tracker, code) = tracker();
        for _ in 0..3 {
            tracker.track_items(&code, &["Milk".to_string()]).unwrap();
        }

        let history = tracker.get_history(&code).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "milk");
        assert_eq!(history[0].count, 3);
    }

    #[test]
    fn test_names_are_lower_cased() {
        let (tracker, code) = tracker();
        tracker
            .track_items(&code, &["Latte".to_string(), "LATTE".to_string()])
            .unwrap();

        let history = tracker.get_history(&code).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].count, 2);
    }

    #[test]
    fn test_sorted_by_count_descending() {
        let (tracker, code) = tracker();
        tracker.track_items(&code, &["pane".to_string()]).unwrap();
        tracker
            .track_items(&code, &["latte".to_string(), "latte".to_string()])
            .unwrap();

        let history = tracker.get_history(&code).unwrap();
        assert_eq!(history[0].name, "latte");
        assert_eq!(history[0].count, 2);
        assert_eq!(history[1].name, "pane");
    }

    #[test]
    fn test_duplicates_in_one_call_count_twice() {
        let (tracker, code) = tracker();
        tracker
            .track_items(&code, &["uova".to_string(), "uova".to_string()])
            .unwrap();

        let history = tracker.get_history(&code).unwrap();
        assert_eq!(history[0].count, 2);
    }

    #[test]
    fn test_lists_have_independent_history() {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(MemoryBackend::new());
        let tracker = HistoryTracker::new(backend);
        let code_a = ListCode::parse("AAAAAA").unwrap();
        let code_b = ListCode::parse("BBBBBB").unwrap();

        tracker.track_items(&code_a, &["milk".to_string()]).unwrap();

        assert_eq!(tracker.get_history(&code_a).unwrap().len(), 1);
        assert!(tracker.get_history(&code_b).unwrap().is_empty());
    }
}
