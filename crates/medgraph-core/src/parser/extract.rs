//! Fact extraction from a decoded record.
//!
//! Cleanup rules are fixed policy:
//! - a symptom ending in `...` loses those three characters
//! - a nested treatment entry is reduced to its first element, and kept only
//!   if at least two characters long
//! - a drug detail is `manufacturer,product`, exactly two parts
//! - only the last listed department is linked to the disease

use crate::model::{Category, DiseaseRecord, Entity, Fact, Relation, RelationKind};

use super::record::{CureWay, RawRecord};

const ELLIPSIS: &str = "...";
const MIN_TREATMENT_CHARS: usize = 2;

/// Extract every fact carried by one record.
///
/// Returns `None` when the record has no disease name: the name is the
/// natural key the other facts hang off.
pub fn extract_facts(record: RawRecord) -> Option<Vec<Fact>> {
    let disease = record.name;
    if disease.trim().is_empty() {
        return None;
    }

    let mut facts = Vec::new();
    facts.push(Fact::Disease(DiseaseRecord {
        name: disease.clone(),
        summary: record.desc,
        cause: record.cause,
        prevention: record.prevent,
        cure_duration: record.cure_lasttime,
        cure_probability: record.cured_prob,
        susceptible_population: record.easy_get,
    }));

    let drugs = non_empty(record.common_drug.into_iter().chain(record.recommand_drug));
    fan_out(&mut facts, &disease, RelationKind::UsesDrug, drugs);

    let do_eat = non_empty(record.do_eat.into_iter().chain(record.recommand_eat));
    fan_out(&mut facts, &disease, RelationKind::RecommendsFood, do_eat);

    let not_eat = non_empty(record.not_eat);
    fan_out(&mut facts, &disease, RelationKind::AvoidsFood, not_eat);

    let exams = non_empty(record.check);
    fan_out(&mut facts, &disease, RelationKind::RequiresExam, exams);

    let departments = non_empty(record.cure_department);
    if let Some(last) = departments.last() {
        facts.push(Relation::new(RelationKind::BelongsToDepartment, &disease, last).into());
    }
    facts.extend(
        departments
            .into_iter()
            .map(|d| Entity::new(Category::Department, d).into()),
    );

    let symptoms = non_empty(record.symptom.iter().map(|s| clean_symptom(s).to_string()));
    fan_out(&mut facts, &disease, RelationKind::HasSymptom, symptoms);

    let treatments: Vec<String> = record.cure_way.into_iter().filter_map(clean_treatment).collect();
    fan_out(&mut facts, &disease, RelationKind::TreatedBy, treatments);

    // Comorbid diseases are linked but not registered: the edge only lands
    // when the other disease has a record of its own.
    for other in non_empty(record.acompany) {
        facts.push(Relation::new(RelationKind::AccompaniedBy, &disease, other).into());
    }

    for detail in &record.drug_detail {
        if let Some((manufacturer, drug)) = parse_drug_detail(detail) {
            facts.push(Entity::new(Category::Manufacturer, manufacturer).into());
            facts.push(Entity::new(Category::Drug, drug).into());
            facts.push(Relation::new(RelationKind::Produces, manufacturer, drug).into());
        }
    }

    Some(facts)
}

/// Register each target as an entity and link it from the disease.
fn fan_out(facts: &mut Vec<Fact>, disease: &str, kind: RelationKind, targets: Vec<String>) {
    let (_, category) = kind.endpoints();
    for target in targets {
        facts.push(Relation::new(kind, disease, target.as_str()).into());
        facts.push(Entity::new(category, target).into());
    }
}

/// Drop empty names; they cannot serve as natural keys.
fn non_empty(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.is_empty()).collect()
}

/// Strip a trailing `...` marker from a symptom.
pub fn clean_symptom(symptom: &str) -> &str {
    symptom.strip_suffix(ELLIPSIS).unwrap_or(symptom)
}

/// Reduce a treatment entry to a single value, dropping values that are too short.
pub fn clean_treatment(way: CureWay) -> Option<String> {
    let value = match way {
        CureWay::Single(s) => s,
        CureWay::Nested(list) => list.into_iter().next()?,
    };
    (value.chars().count() >= MIN_TREATMENT_CHARS).then_some(value)
}

/// Split a `manufacturer,product` detail into its two parts.
pub fn parse_drug_detail(detail: &str) -> Option<(&str, &str)> {
    let mut parts = detail.split(',');
    let manufacturer = parts.next()?.trim();
    let drug = parts.next()?.trim();
    if parts.next().is_some() || manufacturer.is_empty() || drug.is_empty() {
        return None;
    }
    Some((manufacturer, drug))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    fn relations(facts: &[Fact]) -> Vec<&Relation> {
        facts
            .iter()
            .filter_map(|f| match f {
                Fact::Relation(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn entities(facts: &[Fact], category: Category) -> Vec<&str> {
        facts
            .iter()
            .filter_map(|f| match f {
                Fact::Entity(e) if e.category == category => Some(e.name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_clean_symptom() {
        assert_eq!(clean_symptom("headache..."), "headache");
        assert_eq!(clean_symptom("headache"), "headache");
        assert_eq!(clean_symptom("head..ache"), "head..ache");
        assert_eq!(clean_symptom("..."), "");
    }

    #[test]
    fn test_clean_treatment() {
        assert_eq!(clean_treatment(CureWay::Single("rest".into())), Some("rest".into()));
        assert_eq!(
            clean_treatment(CureWay::Nested(vec!["surgery".into(), "x".into()])),
            Some("surgery".into())
        );
        assert_eq!(clean_treatment(CureWay::Single("x".into())), None);
        assert_eq!(clean_treatment(CureWay::Nested(vec!["y".into(), "long".into()])), None);
        assert_eq!(clean_treatment(CureWay::Nested(vec![])), None);
    }

    #[test]
    fn test_clean_treatment_counts_characters() {
        // two characters, six bytes
        assert_eq!(clean_treatment(CureWay::Single("手术".into())), Some("手术".into()));
        assert_eq!(clean_treatment(CureWay::Single("药".into())), None);
    }

    #[test]
    fn test_parse_drug_detail() {
        assert_eq!(parse_drug_detail("Acme,Aspirin"), Some(("Acme", "Aspirin")));
        assert_eq!(parse_drug_detail("bad-entry-no-comma"), None);
        assert_eq!(parse_drug_detail("a,b,c"), None);
        assert_eq!(parse_drug_detail(",Aspirin"), None);
    }

    #[test]
    fn test_drug_detail_facts() {
        let facts = extract_facts(record(
            r#"{"name": "Flu", "drug_detail": ["Acme,Aspirin", "bad-entry-no-comma"]}"#,
        ))
        .unwrap();

        assert_eq!(entities(&facts, Category::Manufacturer), vec!["Acme"]);
        assert_eq!(entities(&facts, Category::Drug), vec!["Aspirin"]);
        let produces: Vec<_> = relations(&facts)
            .into_iter()
            .filter(|r| r.kind == RelationKind::Produces)
            .collect();
        assert_eq!(produces, vec![&Relation::new(RelationKind::Produces, "Acme", "Aspirin")]);
    }

    #[test]
    fn test_disease_attributes_copied() {
        let facts = extract_facts(record(
            r#"{"name": "Flu", "desc": "d", "cause": "c", "prevent": "p",
                "cure_lasttime": "7 days", "cured_prob": "90%", "easy_get": "all"}"#,
        ))
        .unwrap();

        assert_eq!(
            facts[0],
            Fact::Disease(DiseaseRecord {
                name: "Flu".into(),
                summary: "d".into(),
                cause: "c".into(),
                prevention: "p".into(),
                cure_duration: "7 days".into(),
                cure_probability: "90%".into(),
                susceptible_population: "all".into(),
            })
        );
    }

    #[test]
    fn test_only_last_department_linked() {
        let facts = extract_facts(record(
            r#"{"name": "Flu", "cure_department": ["Internal", "Respiratory"]}"#,
        ))
        .unwrap();

        assert_eq!(entities(&facts, Category::Department), vec!["Internal", "Respiratory"]);
        let rels = relations(&facts);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].target_name, "Respiratory");
        assert_eq!(rels[0].kind, RelationKind::BelongsToDepartment);
    }

    #[test]
    fn test_foods_split_by_advice() {
        let facts = extract_facts(record(
            r#"{"name": "Flu", "do_eat": ["soup"], "recommand_eat": ["tea"], "not_eat": ["chili"]}"#,
        ))
        .unwrap();

        let rels = relations(&facts);
        let eat: Vec<_> = rels
            .iter()
            .filter(|r| r.kind == RelationKind::RecommendsFood)
            .map(|r| r.target_name.as_str())
            .collect();
        let avoid: Vec<_> = rels
            .iter()
            .filter(|r| r.kind == RelationKind::AvoidsFood)
            .map(|r| r.target_name.as_str())
            .collect();
        assert_eq!(eat, vec!["soup", "tea"]);
        assert_eq!(avoid, vec!["chili"]);
        assert_eq!(entities(&facts, Category::Food), vec!["soup", "tea", "chili"]);
    }

    #[test]
    fn test_comorbidity_links_without_entity() {
        let facts = extract_facts(record(r#"{"name": "Flu", "acompany": ["Pneumonia"]}"#)).unwrap();

        assert_eq!(
            relations(&facts),
            vec![&Relation::new(RelationKind::AccompaniedBy, "Flu", "Pneumonia")]
        );
        assert!(entities(&facts, Category::Disease).is_empty());
    }

    #[test]
    fn test_empty_lists_produce_no_relations() {
        let facts = extract_facts(record(r#"{"name": "Flu", "symptom": [], "check": []}"#)).unwrap();
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_nameless_record_rejected() {
        assert!(extract_facts(record(r#"{"desc": "no name"}"#)).is_none());
        assert!(extract_facts(record(r#"{"name": "  "}"#)).is_none());
    }
}
