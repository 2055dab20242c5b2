//! Relation grouping by signature.
//!
//! Stores cannot take a node label or an edge type as a query parameter, so
//! every (source category, relation kind, target category) signature needs
//! its own statement. Grouping the relation set by signature lets each group
//! be loaded with one template.

use std::collections::BTreeMap;

use crate::model::{NamePair, Relation, Signature};

/// Relation pairs keyed by their signature.
pub type RelationGroups = BTreeMap<Signature, Vec<NamePair>>;

/// Partition relations by signature.
///
/// Every relation lands in exactly one group. Duplicates in the input are
/// kept as-is, so feed a deduplicated set.
pub fn group_relations<'a>(relations: impl IntoIterator<Item = &'a Relation>) -> RelationGroups {
    let mut groups = RelationGroups::new();
    for relation in relations {
        groups
            .entry(relation.signature())
            .or_default()
            .push(relation.pair());
    }
    groups
}

/// Rebuild the relations held by a grouping.
pub fn ungroup(groups: &RelationGroups) -> impl Iterator<Item = Relation> + '_ {
    groups
        .iter()
        .flat_map(|(signature, pairs)| pairs.iter().map(move |pair| signature.relation(pair)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, RelationKind};
    use std::collections::BTreeSet;

    fn relations() -> BTreeSet<Relation> {
        [
            Relation::new(RelationKind::UsesDrug, "Flu", "Aspirin"),
            Relation::new(RelationKind::UsesDrug, "Cold", "Aspirin"),
            Relation::new(RelationKind::RecommendsFood, "Flu", "Soup"),
            Relation::new(RelationKind::AvoidsFood, "Flu", "Chili"),
            Relation::new(RelationKind::Produces, "Acme", "Aspirin"),
            Relation::new(RelationKind::AccompaniedBy, "Flu", "Cold"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_groups_by_full_signature() {
        let groups = group_relations(&relations());
        assert_eq!(groups.len(), 5);

        let uses_drug = Signature {
            source: Category::Disease,
            kind: RelationKind::UsesDrug,
            target: Category::Drug,
        };
        assert_eq!(groups[&uses_drug].len(), 2);

        // same endpoint categories, different labels, separate groups
        let food_groups = groups
            .keys()
            .filter(|s| s.source == Category::Disease && s.target == Category::Food)
            .count();
        assert_eq!(food_groups, 2);
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let input = relations();
        let groups = group_relations(&input);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, input.len());

        let rebuilt: BTreeSet<Relation> = ungroup(&groups).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_relations(&BTreeSet::new()).is_empty());
    }
}
