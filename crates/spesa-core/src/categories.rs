//! Grocery category vocabulary
//!
//! Items are grouped into a closed set of ten categories (nine named plus
//! the "Altro" catch-all). Labels are the Italian display strings that also
//! appear on the wire and in storage.

use serde::{Deserialize, Serialize};

/// One of the ten fixed grocery categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Frutta e Verdura")]
    FruttaEVerdura,
    #[serde(rename = "Latticini")]
    Latticini,
    #[serde(rename = "Carne e Pesce")]
    CarneEPesce,
    #[serde(rename = "Pane e Cereali")]
    PaneECereali,
    #[serde(rename = "Bevande")]
    Bevande,
    #[serde(rename = "Surgelati")]
    Surgelati,
    #[serde(rename = "Snack e Dolci")]
    SnackEDolci,
    #[serde(rename = "Condimenti")]
    Condimenti,
    #[serde(rename = "Igiene e Casa")]
    IgieneECasa,
    #[serde(rename = "Altro")]
    Altro,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 10] = [
        Category::FruttaEVerdura,
        Category::Latticini,
        Category::CarneEPesce,
        Category::PaneECereali,
        Category::Bevande,
        Category::Surgelati,
        Category::SnackEDolci,
        Category::Condimenti,
        Category::IgieneECasa,
        Category::Altro,
    ];

    /// The display label (also the serialized form)
    pub fn label(&self) -> &'static str {
        match self {
            Category::FruttaEVerdura => "Frutta e Verdura",
            Category::Latticini => "Latticini",
            Category::CarneEPesce => "Carne e Pesce",
            Category::PaneECereali => "Pane e Cereali",
            Category::Bevande => "Bevande",
            Category::Surgelati => "Surgelati",
            Category::SnackEDolci => "Snack e Dolci",
            Category::Condimenti => "Condimenti",
            Category::IgieneECasa => "Igiene e Casa",
            Category::Altro => "Altro",
        }
    }

    /// Emoji shown next to the category label
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::FruttaEVerdura => "🥬",
            Category::Latticini => "🧀",
            Category::CarneEPesce => "🥩",
            Category::PaneECereali => "🍞",
            Category::Bevande => "🥤",
            Category::Surgelati => "🧊",
            Category::SnackEDolci => "🍪",
            Category::Condimenti => "🫒",
            Category::IgieneECasa => "🧹",
            Category::Altro => "📦",
        }
    }

    /// Look up a category by its label
    ///
    /// Returns `None` for anything outside the fixed vocabulary. Callers
    /// that accept untrusted labels (e.g. the extraction service) should
    /// fall back to [`Category::Altro`].
    pub fn from_label(label: &str) -> Option<Self> {
        Category::ALL.iter().copied().find(|c| c.label() == label)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Altro
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_size() {
        assert_eq!(Category::ALL.len(), 10);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Category::from_label("Latticini"), Some(Category::Latticini));
        assert_eq!(Category::from_label("Altro"), Some(Category::Altro));
        assert_eq!(Category::from_label("Elettronica"), None);
    }

    #[test]
    fn test_default_is_altro() {
        assert_eq!(Category::default(), Category::Altro);
    }

    #[test]
    fn test_serialization_uses_label() {
        let json = serde_json::to_string(&Category::FruttaEVerdura).unwrap();
        assert_eq!(json, "\"Frutta e Verdura\"");

        let parsed: Category = serde_json::from_str("\"Igiene e Casa\"").unwrap();
        assert_eq!(parsed, Category::IgieneECasa);
    }

    #[test]
    fn test_every_category_has_emoji() {
        for category in Category::ALL {
            assert!(!category.emoji().is_empty());
        }
    }
}
