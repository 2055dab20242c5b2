//! Deduplicating aggregation of parsed facts.
//!
//! The aggregator is an explicit value threaded through the pipeline:
//! facts go in, an [`Aggregate`] of unique entities and relations comes out.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Category, DiseaseRecord, Fact, Relation};

/// Collects facts into per-category unique sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    diseases: BTreeMap<String, DiseaseRecord>,
    entities: BTreeMap<Category, BTreeSet<String>>,
    relations: BTreeSet<Relation>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one fact.
    ///
    /// A disease record overwrites an earlier record of the same name (last
    /// write wins). A bare disease entity never replaces attributes that are
    /// already known.
    pub fn absorb(&mut self, fact: Fact) {
        match fact {
            Fact::Disease(record) => {
                self.diseases.insert(record.name.clone(), record);
            }
            Fact::Entity(entity) if entity.category == Category::Disease => {
                self.diseases
                    .entry(entity.name.clone())
                    .or_insert_with(|| DiseaseRecord::named(entity.name));
            }
            Fact::Entity(entity) => {
                self.entities
                    .entry(entity.category)
                    .or_default()
                    .insert(entity.name);
            }
            Fact::Relation(relation) => {
                self.relations.insert(relation);
            }
        }
    }

    /// Absorb every fact of an iterator.
    pub fn absorb_all(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.absorb(fact);
        }
    }

    /// Finish aggregation.
    pub fn finish(self) -> Aggregate {
        Aggregate {
            diseases: self.diseases.into_values().collect(),
            entities: self
                .entities
                .into_iter()
                .map(|(category, names)| (category, names.into_iter().collect()))
                .collect(),
            relations: self.relations,
        }
    }
}

impl Extend<Fact> for Aggregator {
    fn extend<T: IntoIterator<Item = Fact>>(&mut self, iter: T) {
        self.absorb_all(iter);
    }
}

impl FromIterator<Fact> for Aggregator {
    fn from_iter<T: IntoIterator<Item = Fact>>(iter: T) -> Self {
        let mut aggregator = Self::new();
        aggregator.absorb_all(iter);
        aggregator
    }
}

/// Unique entities and relations ready for loading.
///
/// Ordering within a category is an implementation detail; consumers must
/// not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Disease records, unique by name.
    pub diseases: Vec<DiseaseRecord>,
    /// Names of identity-only entities, unique per category.
    pub entities: BTreeMap<Category, Vec<String>>,
    /// Unique relations across the whole run.
    pub relations: BTreeSet<Relation>,
}

impl Aggregate {
    /// Unique names of one identity-only category.
    pub fn names(&self, category: Category) -> &[String] {
        self.entities.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories holding at least one entity.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.entity_count(*c) > 0)
            .collect()
    }

    /// Number of unique entities in a category.
    pub fn entity_count(&self, category: Category) -> usize {
        match category {
            Category::Disease => self.diseases.len(),
            other => self.names(other).len(),
        }
    }

    /// Number of unique entities across every category.
    pub fn total_entities(&self) -> usize {
        Category::ALL.into_iter().map(|c| self.entity_count(c)).sum()
    }
}
