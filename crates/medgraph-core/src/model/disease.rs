//! Disease node with descriptive attributes.

use serde::{Deserialize, Serialize};

/// A disease entity and its six descriptive attributes.
///
/// Absent attributes are empty strings, never missing, so a re-import
/// always overwrites every attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Natural key.
    pub name: String,
    /// Short description of the disease.
    pub summary: String,
    /// Known causes.
    pub cause: String,
    /// Prevention measures.
    pub prevention: String,
    /// Typical treatment duration.
    pub cure_duration: String,
    /// Probability of cure.
    pub cure_probability: String,
    /// Population most susceptible to the disease.
    pub susceptible_population: String,
}

impl DiseaseRecord {
    /// Attribute names in statement order, excluding the natural key.
    pub const ATTRIBUTES: [&'static str; 6] = [
        "summary",
        "cause",
        "prevention",
        "cure_duration",
        "cure_probability",
        "susceptible_population",
    ];

    /// Create a disease without attributes.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attribute values in the same order as [`Self::ATTRIBUTES`].
    pub fn attributes(&self) -> [&str; 6] {
        [
            self.summary.as_str(),
            self.cause.as_str(),
            self.prevention.as_str(),
            self.cure_duration.as_str(),
            self.cure_probability.as_str(),
            self.susceptible_population.as_str(),
        ]
    }
}
