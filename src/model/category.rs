//! Class categories for bounding-box labels.
//!
//! Label files store the class as a trailing integer; the gallery replaces it
//! with the category name before anything is rendered.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Label used for any class id missing from the map.
pub const UNKNOWN_LABEL: &str = "unknown";

/// An annotation category with an id and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Class id as stored in label files
    pub id: i64,
    /// Display name of the category
    pub name: String,
}

impl Category {
    /// Create a new category with the given ID and name.
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Default categories for cell annotation.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(0, "lymphocyte"),
        Category::new(1, "lymphoplasmocyte"),
        Category::new(2, "plasmocyte"),
        Category::new(3, "other"),
    ]
}

/// Fixed class id to label lookup.
#[derive(Debug, Clone)]
pub struct ClassMap {
    labels: HashMap<i64, String>,
}

impl ClassMap {
    /// Build a map from a list of categories. Later duplicates win.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            labels: categories.into_iter().map(|c| (c.id, c.name)).collect(),
        }
    }

    /// Resolve a class id, falling back to [`UNKNOWN_LABEL`].
    pub fn label(&self, id: i64) -> &str {
        self.labels
            .get(&id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the map has no classes at all.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for ClassMap {
    fn default() -> Self {
        Self::new(default_categories())
    }
}
