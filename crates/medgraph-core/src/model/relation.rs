//! Relation kinds, relation instances and relation signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Category;

/// Kind of a directed relation between two entities.
///
/// Each kind connects a fixed pair of categories. Like [`Category`], the set
/// is closed so relation labels can be written into statements literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Disease is treated with a drug.
    UsesDrug,
    /// Food recommended for a disease.
    RecommendsFood,
    /// Food to avoid with a disease.
    AvoidsFood,
    /// Examination needed to diagnose a disease.
    RequiresExam,
    /// Department that treats a disease.
    BelongsToDepartment,
    /// Symptom of a disease.
    HasSymptom,
    /// Treatment method for a disease.
    TreatedBy,
    /// Comorbid disease.
    AccompaniedBy,
    /// Manufacturer produces a drug.
    Produces,
}

impl RelationKind {
    pub const ALL: [RelationKind; 9] = [
        RelationKind::UsesDrug,
        RelationKind::RecommendsFood,
        RelationKind::AvoidsFood,
        RelationKind::RequiresExam,
        RelationKind::BelongsToDepartment,
        RelationKind::HasSymptom,
        RelationKind::TreatedBy,
        RelationKind::AccompaniedBy,
        RelationKind::Produces,
    ];

    /// Relation label as stored on the edge.
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::UsesDrug => "uses-drug",
            RelationKind::RecommendsFood => "recommends-food",
            RelationKind::AvoidsFood => "avoids-food",
            RelationKind::RequiresExam => "requires-exam",
            RelationKind::BelongsToDepartment => "belongs-to-department",
            RelationKind::HasSymptom => "has-symptom",
            RelationKind::TreatedBy => "treated-by",
            RelationKind::AccompaniedBy => "accompanied-by",
            RelationKind::Produces => "produces",
        }
    }

    /// Edge table name for table-based stores (labels are not valid identifiers there).
    pub fn table(&self) -> &'static str {
        match self {
            RelationKind::UsesDrug => "uses_drug",
            RelationKind::RecommendsFood => "recommends_food",
            RelationKind::AvoidsFood => "avoids_food",
            RelationKind::RequiresExam => "requires_exam",
            RelationKind::BelongsToDepartment => "belongs_to_department",
            RelationKind::HasSymptom => "has_symptom",
            RelationKind::TreatedBy => "treated_by",
            RelationKind::AccompaniedBy => "accompanied_by",
            RelationKind::Produces => "produces",
        }
    }

    /// Source and target categories connected by this kind.
    pub fn endpoints(&self) -> (Category, Category) {
        match self {
            RelationKind::UsesDrug => (Category::Disease, Category::Drug),
            RelationKind::RecommendsFood | RelationKind::AvoidsFood => {
                (Category::Disease, Category::Food)
            }
            RelationKind::RequiresExam => (Category::Disease, Category::ExamItem),
            RelationKind::BelongsToDepartment => (Category::Disease, Category::Department),
            RelationKind::HasSymptom => (Category::Disease, Category::Symptom),
            RelationKind::TreatedBy => (Category::Disease, Category::Treatment),
            RelationKind::AccompaniedBy => (Category::Disease, Category::Disease),
            RelationKind::Produces => (Category::Manufacturer, Category::Drug),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A directed, typed edge between two named entities.
///
/// Identity is the full 5-tuple; two relations with equal fields are the
/// same relation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub source: Category,
    pub source_name: String,
    pub kind: RelationKind,
    pub target: Category,
    pub target_name: String,
}

impl Relation {
    /// Create a relation of the given kind; endpoint categories follow from the kind.
    pub fn new(kind: RelationKind, source_name: impl Into<String>, target_name: impl Into<String>) -> Self {
        let (source, target) = kind.endpoints();
        Self {
            source,
            source_name: source_name.into(),
            kind,
            target,
            target_name: target_name.into(),
        }
    }

    /// The (source category, kind, target category) signature of this relation.
    pub fn signature(&self) -> Signature {
        Signature {
            source: self.source,
            kind: self.kind,
            target: self.target,
        }
    }

    /// The endpoint names of this relation.
    pub fn pair(&self) -> NamePair {
        NamePair {
            source: self.source_name.clone(),
            target: self.target_name.clone(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{})-[{}]->({}:{})",
            self.source, self.source_name, self.kind, self.target, self.target_name
        )
    }
}

/// Shape shared by all relations of a group: one statement template per signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub source: Category,
    pub kind: RelationKind,
    pub target: Category,
}

impl Signature {
    /// Rebuild the relation for one pair of this signature.
    pub fn relation(&self, pair: &NamePair) -> Relation {
        Relation {
            source: self.source,
            source_name: pair.source.clone(),
            kind: self.kind,
            target: self.target,
            target_name: pair.target.clone(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}->{}", self.source, self.kind, self.target)
    }
}

/// Source and target names of one edge within a relation group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamePair {
    pub source: String,
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_endpoint_categories() {
        let rel = Relation::new(RelationKind::Produces, "Acme", "Aspirin");
        assert_eq!(rel.source, Category::Manufacturer);
        assert_eq!(rel.target, Category::Drug);
        assert_eq!(rel.kind.label(), "produces");
    }

    #[test]
    fn test_signature_round_trip() {
        let rel = Relation::new(RelationKind::UsesDrug, "Flu", "Aspirin");
        let sig = rel.signature();
        assert_eq!(sig.relation(&rel.pair()), rel);
        assert_eq!(sig.to_string(), "Disease->uses-drug->Drug");
    }

    #[test]
    fn test_tables_are_identifiers() {
        for kind in RelationKind::ALL {
            assert!(kind
                .table()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
