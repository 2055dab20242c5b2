//! Data model for the medical knowledge graph.
//!
//! - [`Category`] - closed set of node labels
//! - [`RelationKind`] - closed set of edge labels, each with fixed endpoint categories
//! - [`DiseaseRecord`] - the one node type carrying attributes
//! - [`Fact`] - what the record parser emits and the aggregator consumes

mod category;
mod disease;
mod relation;

pub use category::{Category, NATURAL_KEY};
pub use disease::DiseaseRecord;
pub use relation::{NamePair, Relation, RelationKind, Signature};

use serde::{Deserialize, Serialize};

/// An identity-only entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub category: Category,
    pub name: String,
}

impl Entity {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

/// A single fact extracted from an input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// A disease with its attributes.
    Disease(DiseaseRecord),
    /// An entity known only by name.
    Entity(Entity),
    /// A typed relation between two entities.
    Relation(Relation),
}

impl From<DiseaseRecord> for Fact {
    fn from(d: DiseaseRecord) -> Self {
        Fact::Disease(d)
    }
}

impl From<Entity> for Fact {
    fn from(e: Entity) -> Self {
        Fact::Entity(e)
    }
}

impl From<Relation> for Fact {
    fn from(r: Relation) -> Self {
        Fact::Relation(r)
    }
}
