use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};

/// Payload object that extracted resume fields live under.
pub const METADATA_PREFIX: &str = "metadata";

/// Bare keys that address fields of the `metadata` object.
pub const METADATA_FIELDS: &[&str] = &[
    "name",
    "age",
    "location",
    "current_role",
    "years_of_experience",
    "skills",
    "languages",
    "education",
];

/// Conjunction of field conditions, serialized in the vector store's native
/// filter syntax: `{"must": [{"key": ..., "match": {"value": ...}}, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterExpression {
    pub must: Vec<FieldCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCondition {
    pub key: String,
    #[serde(flatten)]
    pub test: Condition,
}

/// A single test against a payload field. When the stored field holds a
/// list, the test passes if any element satisfies it, so an equality test
/// against a list field is a membership test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Match { value: Value },
    /// Exact equality on a non-integer number, which keyword matching
    /// cannot express.
    Range { gte: f64, lte: f64 },
}

impl FilterExpression {
    pub fn len(&self) -> usize {
        self.must.len()
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
    }

    /// Evaluate the expression against a payload locally.
    pub fn matches(&self, payload: &Map<String, Value>) -> bool {
        self.must.iter().all(|c| c.matches(payload))
    }
}

impl FieldCondition {
    pub fn matches(&self, payload: &Map<String, Value>) -> bool {
        let Some(stored) = get_field_value(payload, &self.key) else {
            return false;
        };
        match stored {
            Value::Array(items) => items.iter().any(|item| self.test.accepts(item)),
            scalar => self.test.accepts(scalar),
        }
    }
}

impl Condition {
    fn accepts(&self, stored: &Value) -> bool {
        match self {
            Condition::Match { value } => scalar_eq(stored, value),
            Condition::Range { gte, lte } => stored
                .as_f64()
                .map(|n| n >= *gte && n <= *lte)
                .unwrap_or(false),
        }
    }
}

/// Keyword equality: an integer never equals a float, as in the store's
/// `match` condition.
fn scalar_eq(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => {
            a.is_f64() == b.is_f64() && a.as_f64() == b.as_f64()
        }
        _ => stored == wanted,
    }
}

/// Resolve a dotted path (`metadata.location`) inside a payload.
pub fn get_field_value<'a>(payload: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let mut parts = field.split('.');
    let mut current = payload.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

/// Known resume fields address the `metadata` object; every other key,
/// dotted or not, is taken as a full payload path.
pub fn field_path(key: &str) -> String {
    if METADATA_FIELDS.contains(&key) {
        format!("{METADATA_PREFIX}.{key}")
    } else {
        key.to_string()
    }
}

/// Translate a flat `field -> value | [values]` mapping into a filter
/// expression. An empty mapping yields `None`, meaning unconstrained.
///
/// A list value requires every element to be present (one condition per
/// element). An empty list adds no condition.
pub fn translate(filters: &Map<String, Value>) -> QueryResult<Option<FilterExpression>> {
    let mut must = Vec::with_capacity(filters.len());

    for (key, value) in filters {
        if key.trim().is_empty() {
            return Err(QueryError::InvalidQuery("Filter field name must not be empty".to_string()));
        }
        let path = field_path(key);
        match value {
            Value::Array(values) => {
                for v in values {
                    must.push(FieldCondition {
                        key: path.clone(),
                        test: scalar_condition(key, v)?,
                    });
                }
            }
            scalar => must.push(FieldCondition {
                key: path,
                test: scalar_condition(key, scalar)?,
            }),
        }
    }

    if must.is_empty() {
        return Ok(None);
    }
    Ok(Some(FilterExpression { must }))
}

fn scalar_condition(field: &str, value: &Value) -> QueryResult<Condition> {
    match value {
        Value::String(_) | Value::Bool(_) => Ok(Condition::Match { value: value.clone() }),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Condition::Match { value: value.clone() }),
        Value::Number(n) => {
            let x = n
                .as_f64()
                .ok_or_else(|| QueryError::InvalidQuery(format!("Invalid number for filter field: {field}")))?;
            Ok(Condition::Range { gte: x, lte: x })
        }
        Value::Null | Value::Array(_) | Value::Object(_) => Err(QueryError::InvalidQuery(format!(
            "Invalid filter value for field: {field}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_filters_yield_none() {
        assert_eq!(translate(&Map::new()).unwrap(), None);
        assert_eq!(translate(&map(json!({"skills": []}))).unwrap(), None);
    }

    #[test]
    fn test_condition_count_matches_scalar_entries() {
        let filters = map(json!({
            "location": "Remote",
            "current_role": "Backend Engineer",
            "years_of_experience": 5,
            "open_to_relocation": true
        }));
        let expr = translate(&filters).unwrap().unwrap();
        assert_eq!(expr.len(), filters.len());
    }

    #[test]
    fn test_native_filter_shape() {
        let expr = translate(&map(json!({"location": "Remote"}))).unwrap().unwrap();
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"must": [{"key": "metadata.location", "match": {"value": "Remote"}}]})
        );
    }

    #[test]
    fn test_field_paths() {
        let expr = translate(&map(json!({
            "filename": "a.pdf",
            "metadata.name": "A",
            "current_role": "SRE"
        })))
        .unwrap()
        .unwrap();
        let keys: Vec<&str> = expr.must.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["filename", "metadata.name", "metadata.current_role"]);
    }

    #[test]
    fn test_top_level_field_is_filterable() {
        let expr = translate(&map(json!({"filename": "ana.pdf"}))).unwrap().unwrap();
        assert!(expr.matches(&map(json!({"filename": "ana.pdf", "metadata": {"name": "Ana"}}))));
        assert!(!expr.matches(&map(json!({"filename": "ben.pdf", "metadata": {"name": "Ben"}}))));
    }

    #[test]
    fn test_list_value_requires_every_element() {
        let expr = translate(&map(json!({"skills": ["Rust", "Python"]}))).unwrap().unwrap();
        assert_eq!(expr.len(), 2);

        let both = map(json!({"metadata": {"skills": ["Python", "Rust", "Go"]}}));
        let one = map(json!({"metadata": {"skills": ["Python"]}}));
        assert!(expr.matches(&both));
        assert!(!expr.matches(&one));
    }

    #[test]
    fn test_scalar_on_list_field_is_membership() {
        let expr = translate(&map(json!({"skills": "Rust"}))).unwrap().unwrap();
        assert!(expr.matches(&map(json!({"metadata": {"skills": ["Go", "Rust"]}}))));
        assert!(!expr.matches(&map(json!({"metadata": {"skills": ["Go"]}}))));
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let expr = translate(&map(json!({"favourite_colour": "blue"}))).unwrap().unwrap();
        assert!(!expr.matches(&map(json!({"metadata": {"name": "A"}}))));
    }

    #[test]
    fn test_float_equality_uses_range() {
        let expr = translate(&map(json!({"years_of_experience": 3.5}))).unwrap().unwrap();
        assert_eq!(expr.must[0].test, Condition::Range { gte: 3.5, lte: 3.5 });
        assert!(expr.matches(&map(json!({"metadata": {"years_of_experience": 3.5}}))));
    }

    #[test]
    fn test_integer_match_is_strict_about_number_kind() {
        let expr = translate(&map(json!({"years_of_experience": 5}))).unwrap().unwrap();
        assert!(expr.matches(&map(json!({"metadata": {"years_of_experience": 5}}))));
        assert!(!expr.matches(&map(json!({"metadata": {"years_of_experience": 5.0}}))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            translate(&map(json!({"location": null}))),
            Err(QueryError::InvalidQuery(_))
        ));
        assert!(matches!(
            translate(&map(json!({"location": {"$ne": "Remote"}}))),
            Err(QueryError::InvalidQuery(_))
        ));
        assert!(matches!(
            translate(&map(json!({"skills": [["Rust"]]}))),
            Err(QueryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_translate_does_not_mutate_input() {
        let filters = map(json!({"location": "Remote", "skills": ["Rust"]}));
        let before = filters.clone();
        let _ = translate(&filters).unwrap();
        assert_eq!(filters, before);
    }
}
