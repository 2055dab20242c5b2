//! Entity categories (node labels).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute used as the natural key of every entity category.
pub const NATURAL_KEY: &str = "name";

/// Category of a medical entity.
///
/// The set is closed: store statements interpolate these labels literally,
/// so nothing derived from input data ever reaches a statement template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A disease, the only category carrying descriptive attributes.
    Disease,
    /// A drug or medicine product.
    Drug,
    /// A food item (recommended or to be avoided).
    Food,
    /// A medical examination item.
    ExamItem,
    /// A hospital department.
    Department,
    /// A symptom.
    Symptom,
    /// A treatment method.
    Treatment,
    /// A drug manufacturer.
    Manufacturer,
}

impl Category {
    /// Every category, in load order.
    pub const ALL: [Category; 8] = [
        Category::Disease,
        Category::Drug,
        Category::Food,
        Category::ExamItem,
        Category::Department,
        Category::Symptom,
        Category::Treatment,
        Category::Manufacturer,
    ];

    /// Node label used by label-based stores.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Disease => "Disease",
            Category::Drug => "Drug",
            Category::Food => "Food",
            Category::ExamItem => "ExamItem",
            Category::Department => "Department",
            Category::Symptom => "Symptom",
            Category::Treatment => "Treatment",
            Category::Manufacturer => "Manufacturer",
        }
    }

    /// Table name used by table-based stores.
    pub fn table(&self) -> &'static str {
        match self {
            Category::Disease => "disease",
            Category::Drug => "drug",
            Category::Food => "food",
            Category::ExamItem => "exam_item",
            Category::Department => "department",
            Category::Symptom => "symptom",
            Category::Treatment => "treatment",
            Category::Manufacturer => "manufacturer",
        }
    }

    /// Whether nodes of this category carry attributes beyond the name.
    pub fn has_attributes(&self) -> bool {
        matches!(self, Category::Disease)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
