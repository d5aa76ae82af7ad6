//! Data models for Spesa
//!
//! Defines the core data structures: the stored `GroceryItem`, the incoming
//! `NewItem` payload, partial updates, and history entries. Field names are
//! serialized in camelCase to match the wire format shared with web clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::categories::Category;

/// A single item on a shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    /// Unique identifier, stable for the item's lifetime
    pub id: Uuid,
    /// Display name, caller's casing preserved
    pub name: String,
    /// Free-text quantity ("2 kg", "3"); `None` means unspecified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Category from the fixed vocabulary; older records default to Altro
    #[serde(default)]
    pub category: Category,
    /// Purchased flag
    pub checked: bool,
    /// When this item was created
    pub created_at: DateTime<Utc>,
}

impl GroceryItem {
    /// Create a new unchecked item
    pub fn new(name: impl Into<String>, quantity: Option<String>, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            category,
            checked: false,
            created_at: Utc::now(),
        }
    }

    /// The name as used for duplicate matching and history keys
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// An incoming item to add to a list, before reconciliation
///
/// Produced by the extraction service or typed input. Category is optional
/// here; it defaults to [`Category::Altro`] when the item is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl NewItem {
    /// Create a bare item with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            category: None,
        }
    }

    /// Set the quantity
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// A partial update to an existing item
///
/// Only fields that are `Some` are written; category and checked state are
/// never touched through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// A (name, cumulative count) pair from a list's purchase history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Lower-cased item name
    pub name: String,
    /// How many times the name has been added
    pub count: i64,
}

/// Normalize a name for duplicate matching: lower-cased and trimmed
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_defaults() {
        let item = GroceryItem::new("Latte", None, Category::Latticini);
        assert_eq!(item.name, "Latte");
        assert!(item.quantity.is_none());
        assert!(!item.checked);
        assert_eq!(item.category, Category::Latticini);
    }

    #[test]
    fn test_normalized_name() {
        let item = GroceryItem::new("  Pane Integrale ", None, Category::default());
        assert_eq!(item.normalized_name(), "pane integrale");
    }

    #[test]
    fn test_serialization_round_trip() {
        let item = GroceryItem::new("Latte", Some("1 L".to_string()), Category::Latticini);
        let json = serde_json::to_string(&item).unwrap();
        let deserialized: GroceryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let item = GroceryItem::new("Latte", None, Category::default());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"createdAt\""));
        // unspecified quantity is omitted, not null
        assert!(!json.contains("quantity"));
    }

    #[test]
    fn test_item_without_category_defaults_to_altro() {
        let json = r#"{
            "id": "6f9619ff-8b86-4011-b42d-00cf4fc964ff",
            "name": "Sale",
            "checked": false,
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let item: GroceryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, Category::Altro);
    }

    #[test]
    fn test_new_item_builder() {
        let item = NewItem::named("Mele")
            .with_quantity("2 kg")
            .with_category(Category::FruttaEVerdura);
        assert_eq!(item.name, "Mele");
        assert_eq!(item.quantity.as_deref(), Some("2 kg"));
        assert_eq!(item.category, Some(Category::FruttaEVerdura));
    }
}
