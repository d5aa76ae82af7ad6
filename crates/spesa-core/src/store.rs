//! Item store
//!
//! The `ItemStore` owns a list's item collection. Every mutation follows
//! the same shape: read the full collection, transform it in memory, write
//! the full collection back under one key. The pair is not atomic across
//! callers; concurrent writers race and the last full write wins, which the
//! polling clients tolerate.
//!
//! Additions are reconciled against the current collection: an incoming
//! item whose normalized name matches an existing *unchecked* item merges
//! into it (quantity summed when units agree, category upgraded from Altro)
//! instead of creating a duplicate row.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;
use uuid::Uuid;

use crate::categories::Category;
use crate::code::ListCode;
use crate::history::HistoryTracker;
use crate::models::{normalize_name, GroceryItem, ItemUpdate, NewItem};
use crate::quantity::merge_quantities;
use crate::storage::KeyValueBackend;

/// Store for a list's item collection
pub struct ItemStore {
    backend: Arc<dyn KeyValueBackend>,
    history: HistoryTracker,
}

impl ItemStore {
    /// Create a store over the given backend
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        let history = HistoryTracker::new(Arc::clone(&backend));
        Self { backend, history }
    }

    /// The history tracker sharing this store's backend
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Get the list's current items
    ///
    /// An absent entry reads as an empty collection; "list not found" is
    /// the registry's concern, not this one's.
    pub fn get_items(&self, code: &ListCode) -> Result<Vec<GroceryItem>> {
        match self
            .backend
            .get(&code.list_key())
            .with_context(|| format!("Failed to read list {}", code))?
        {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Failed to decode items for list {}", code)),
            None => Ok(Vec::new()),
        }
    }

    fn save_items(&self, code: &ListCode, items: &[GroceryItem]) -> Result<()> {
        let raw = serde_json::to_string(items)
            .with_context(|| format!("Failed to encode items for list {}", code))?;
        self.backend
            .set(&code.list_key(), &raw)
            .with_context(|| format!("Failed to write list {}", code))
    }

    /// Add items, merging duplicates into existing unchecked entries
    ///
    /// Returns only the newly created items; merged additions mutate their
    /// match in place and are absent from the return value. Every incoming
    /// name is recorded in the history, merged or not.
    pub fn add_items(&self, code: &ListCode, incoming: &[NewItem]) -> Result<Vec<GroceryItem>> {
        let mut items = self.get_items(code)?;
        let mut created = Vec::new();

        for new_item in incoming {
            let normalized = normalize_name(&new_item.name);
            let matched = items
                .iter_mut()
                .find(|item| !item.checked && item.normalized_name() == normalized);

            match matched {
                Some(existing) => {
                    existing.quantity = merge_quantities(
                        existing.quantity.as_deref(),
                        new_item.quantity.as_deref(),
                    );
                    // Upgrade the category when the incoming one is more specific
                    if let Some(category) = new_item.category {
                        if category != Category::Altro && existing.category == Category::Altro {
                            existing.category = category;
                        }
                    }
                    debug!(code = %code, name = %new_item.name, "merged into existing item");
                }
                None => {
                    let item = GroceryItem::new(
                        new_item.name.clone(),
                        new_item.quantity.clone(),
                        new_item.category.unwrap_or_default(),
                    );
                    items.push(item.clone());
                    created.push(item);
                }
            }
        }

        self.save_items(code, &items)?;

        let names: Vec<String> = incoming.iter().map(|item| item.name.clone()).collect();
        self.history.track_items(code, &names)?;

        debug!(code = %code, incoming = incoming.len(), created = created.len(), "added items");
        Ok(created)
    }

    /// Flip the purchased flag on the item with this id
    ///
    /// A missing id leaves the collection unchanged. Returns the full
    /// post-update collection.
    pub fn toggle_item(&self, code: &ListCode, id: Uuid) -> Result<Vec<GroceryItem>> {
        let mut items = self.get_items(code)?;
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            item.checked = !item.checked;
        }
        self.save_items(code, &items)?;
        Ok(items)
    }

    /// Remove the item with this id (no-op if absent)
    pub fn remove_item(&self, code: &ListCode, id: Uuid) -> Result<Vec<GroceryItem>> {
        let mut items = self.get_items(code)?;
        items.retain(|item| item.id != id);
        self.save_items(code, &items)?;
        Ok(items)
    }

    /// Replace the collection with empty
    pub fn clear_items(&self, code: &ListCode) -> Result<()> {
        self.save_items(code, &[])
    }

    /// Remove all checked items, returning the survivors
    pub fn clear_checked_items(&self, code: &ListCode) -> Result<Vec<GroceryItem>> {
        let mut items = self.get_items(code)?;
        items.retain(|item| !item.checked);
        self.save_items(code, &items)?;
        Ok(items)
    }

    /// Overwrite only the supplied fields on the matching item
    ///
    /// Category and checked state are untouched. A missing id is a no-op.
    pub fn update_item(
        &self,
        code: &ListCode,
        id: Uuid,
        update: &ItemUpdate,
    ) -> Result<Vec<GroceryItem>> {
        let mut items = self.get_items(code)?;
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            if let Some(name) = &update.name {
                item.name = name.clone();
            }
            if let Some(quantity) = &update.quantity {
                item.quantity = Some(quantity.clone());
            }
        }
        self.save_items(code, &items)?;
        Ok(items)
    }
}
