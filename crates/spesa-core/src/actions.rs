//! List mutation actions
//!
//! The transport layer hands mutations over as a tagged payload (the
//! `action` field selects the operation). Modeled as a closed enum so an
//! unrecognized action fails at decode time, before any store call.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::ListCode;
use crate::models::{GroceryItem, ItemUpdate, NewItem};
use crate::store::ItemStore;

/// One mutation against a list's item collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListAction {
    /// Add items, merging duplicates
    Add { items: Vec<NewItem> },
    /// Flip an item's purchased flag
    Toggle { id: Uuid },
    /// Remove an item
    Remove { id: Uuid },
    /// Overwrite name and/or quantity on an item
    Update {
        id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quantity: Option<String>,
    },
    /// Remove all checked items
    ClearChecked,
    /// Empty the list
    ClearAll,
}

impl ListAction {
    /// Run this action against a list
    ///
    /// Returns the items the caller should render: the full post-update
    /// collection for most actions, only the newly created items for `Add`.
    pub fn apply(&self, store: &ItemStore, code: &ListCode) -> Result<Vec<GroceryItem>> {
        match self {
            ListAction::Add { items } => store.add_items(code, items),
            ListAction::Toggle { id } => store.toggle_item(code, *id),
            ListAction::Remove { id } => store.remove_item(code, *id),
            ListAction::Update { id, name, quantity } => {
                let update = ItemUpdate {
                    name: name.clone(),
                    quantity: quantity.clone(),
                };
                store.update_item(code, *id, &update)
            }
            ListAction::ClearChecked => store.clear_checked_items(code),
            ListAction::ClearAll => {
                store.clear_items(code)?;
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueBackend, MemoryBackend};
    use std::sync::Arc;

    fn store() -> (ItemStore, ListCode) {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(MemoryBackend::new());
        (ItemStore::new(backend), ListCode::generate())
    }

    #[test]
    fn test_decode_add() {
        let json = r#"{"action": "add", "items": [{"name": "Latte", "quantity": "1 L"}]}"#;
        let action: ListAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            ListAction::Add {
                items: vec![NewItem::named("Latte").with_quantity("1 L")]
            }
        );
    }

    #[test]
    fn test_decode_clear_variants() {
        let action: ListAction = serde_json::from_str(r#"{"action": "clear_checked"}"#).unwrap();
        assert_eq!(action, ListAction::ClearChecked);

        let action: ListAction = serde_json::from_str(r#"{"action": "clear_all"}"#).unwrap();
        assert_eq!(action, ListAction::ClearAll);
    }

    #[test]
    fn test_decode_update_with_partial_fields() {
        let json = r#"{"action": "update", "id": "6f9619ff-8b86-4011-b42d-00cf4fc964ff", "name": "Pane"}"#;
        let action: ListAction = serde_json::from_str(json).unwrap();
        match action {
            ListAction::Update { name, quantity, .. } => {
                assert_eq!(name.as_deref(), Some("Pane"));
                assert!(quantity.is_none());
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_fails_to_decode() {
        let result: Result<ListAction, _> =
            serde_json::from_str(r#"{"action": "explode", "id": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_add_then_toggle() {
        let (store, code) = store();

        let created = ListAction::Add {
            items: vec![NewItem::named("Latte")],
        }
        .apply(&store, &code)
        .unwrap();
        assert_eq!(created.len(), 1);

        let items = ListAction::Toggle { id: created[0].id }
            .apply(&store, &code)
            .unwrap();
        assert!(items[0].checked);
    }

    #[test]
    fn test_apply_clear_all_returns_empty() {
        let (store, code) = store();
        ListAction::Add {
            items: vec![NewItem::named("Latte")],
        }
        .apply(&store, &code)
        .unwrap();

        let items = ListAction::ClearAll.apply(&store, &code).unwrap();
        assert!(items.is_empty());
        assert!(store.get_items(&code).unwrap().is_empty());
    }
}
