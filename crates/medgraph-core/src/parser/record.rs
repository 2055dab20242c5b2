//! Wire format of one input record.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// One input line, decoded strictly as a JSON object.
///
/// Field names follow the corpus export. Unknown fields (such as the
/// export's `_id`) are ignored. A field with an unexpected shape rejects
/// the whole record, while an unusable element inside a list field is
/// dropped on its own.
///
/// Attributes are carried as text: numbers and booleans keep their JSON
/// spelling (`0.85` becomes `"0.85"`), so every stored attribute is a string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub desc: String,
    #[serde(deserialize_with = "text")]
    pub cause: String,
    #[serde(deserialize_with = "text")]
    pub prevent: String,
    #[serde(deserialize_with = "text")]
    pub cure_lasttime: String,
    #[serde(deserialize_with = "text")]
    pub cured_prob: String,
    #[serde(deserialize_with = "text")]
    pub easy_get: String,

    #[serde(deserialize_with = "list")]
    pub common_drug: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub recommand_drug: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub do_eat: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub recommand_eat: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub not_eat: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub check: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub cure_department: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub symptom: Vec<String>,
    #[serde(deserialize_with = "cure_ways")]
    pub cure_way: Vec<CureWay>,
    #[serde(deserialize_with = "list")]
    pub acompany: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub drug_detail: Vec<String>,
}

/// A treatment-method entry: either a plain value or a nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CureWay {
    Single(String),
    Nested(Vec<String>),
}

/// Text of a JSON scalar; `None` for null, arrays and objects.
fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        _ => None,
    }
}

/// Scalar attribute: strings verbatim, numbers and booleans as their JSON text, null as empty.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        v @ (Value::Array(_) | Value::Object(_)) => {
            Err(de::Error::custom(format!("expected a scalar, found {}", v)))
        }
        other => Ok(scalar(other).unwrap_or_default()),
    }
}

/// List field: null reads as an empty list; non-scalar elements are dropped.
fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.into_iter().filter_map(scalar).collect())
}

/// Treatment list: scalars and nested lists of scalars; anything else is dropped.
fn cure_ways<'de, D>(deserializer: D) -> Result<Vec<CureWay>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::Array(items) => Some(CureWay::Nested(items.into_iter().filter_map(scalar).collect())),
            other => scalar(other).map(CureWay::Single),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let rec: RawRecord = serde_json::from_str(r#"{"name": "Flu"}"#).unwrap();
        assert_eq!(rec.name, "Flu");
        assert!(rec.desc.is_empty());
        assert!(rec.common_drug.is_empty());
    }

    #[test]
    fn test_null_and_numeric_scalars() {
        let rec: RawRecord =
            serde_json::from_str(r#"{"name": "Flu", "desc": null, "cured_prob": 0.85, "symptom": null}"#)
                .unwrap();
        assert_eq!(rec.desc, "");
        assert_eq!(rec.cured_prob, "0.85");
        assert!(rec.symptom.is_empty());
    }

    #[test]
    fn test_cure_way_accepts_nested_lists() {
        let rec: RawRecord =
            serde_json::from_str(r#"{"name": "Flu", "cure_way": ["rest", ["drugs", "x"]]}"#).unwrap();
        assert_eq!(
            rec.cure_way,
            vec![
                CureWay::Single("rest".to_string()),
                CureWay::Nested(vec!["drugs".to_string(), "x".to_string()]),
            ]
        );
    }

    #[test]
    fn test_list_drops_unusable_elements() {
        let rec: RawRecord = serde_json::from_str(
            r#"{"name": "Flu", "symptom": ["Fever", null, {"x": 1}, ["nested"]], "check": [42]}"#,
        )
        .unwrap();
        assert_eq!(rec.symptom, vec!["Fever".to_string()]);
        assert_eq!(rec.check, vec!["42".to_string()]);
    }

    #[test]
    fn test_cure_way_keeps_scalars_only() {
        let rec: RawRecord = serde_json::from_str(
            r#"{"name": "Flu", "cure_way": ["rest", 12, null, {"x": 1}, [null, "surgery"]]}"#,
        )
        .unwrap();
        assert_eq!(
            rec.cure_way,
            vec![
                CureWay::Single("rest".to_string()),
                CureWay::Single("12".to_string()),
                CureWay::Nested(vec!["surgery".to_string()]),
            ]
        );
    }

    #[test]
    fn test_list_field_of_wrong_shape_rejected() {
        let res: Result<RawRecord, _> = serde_json::from_str(r#"{"name": "Flu", "symptom": "cough"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let rec: RawRecord =
            serde_json::from_str(r#"{"_id": {"$oid": "5bb578b6831b973a137e3ee6"}, "name": "Flu"}"#).unwrap();
        assert_eq!(rec.name, "Flu");
    }

    #[test]
    fn test_rejects_object_attribute() {
        let res: Result<RawRecord, _> = serde_json::from_str(r#"{"name": {"nested": true}}"#);
        assert!(res.is_err());
    }
}
