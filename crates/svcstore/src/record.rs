//! Catalog record model

use serde::{Deserialize, Serialize};

/// A record that exposes a fixed, ordered list of textual fields for indexing.
pub trait Searchable {
    /// Fields joined (space separated, lowercased) into the searchable text.
    fn searchable_fields(&self) -> Vec<&str>;

    /// Lowercase, single-space-joined concatenation of [`Self::searchable_fields`]
    fn searchable_text(&self) -> String {
        self.searchable_fields().join(" ").to_lowercase()
    }
}

/// One entry of the services catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Top-level category
    pub category: String,
    /// Optional subcategory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl ServiceRecord {
    /// Create a record without a subcategory
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            subcategory: None,
        }
    }

    /// Set the subcategory
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

impl Searchable for ServiceRecord {
    fn searchable_fields(&self) -> Vec<&str> {
        // A missing subcategory still occupies its slot
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.category.as_str(),
            self.subcategory.as_deref().unwrap_or(""),
        ]
    }
}
