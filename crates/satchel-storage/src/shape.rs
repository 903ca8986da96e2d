//! Top-level shape comparison.

use std::collections::BTreeSet;

use serde_json::Value;

/// The set of top-level field names of a decoded JSON object.
///
/// Used only for shape comparison; field values are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<String>);

impl FieldSet {
    /// Extract the field set from serialized JSON.
    ///
    /// Returns `None` when the text is not decodable as a JSON object.
    pub fn from_json_text(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        Self::from_value(&value)
    }

    /// Extract the field set from a parsed value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map.keys().cloned().collect())),
            _ => None,
        }
    }

    /// Whether two field sets match: equal cardinality with no name present
    /// in one but not the other. Order is irrelevant, case is significant.
    pub fn matches(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    /// Number of field names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no field names.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_order_and_values() {
        let a = FieldSet::from_json_text(r#"{"a": 1, "b": 2}"#).unwrap();
        let b = FieldSet::from_json_text(r#"{"b": "x", "a": null}"#).unwrap();

        assert!(a.matches(&b));
    }

    #[test]
    fn test_extra_field_breaks_match() {
        let a = FieldSet::from_json_text(r#"{"a": 1, "b": 2}"#).unwrap();
        let b = FieldSet::from_json_text(r#"{"a": 1, "b": 2, "c": 3}"#).unwrap();

        assert!(!a.matches(&b));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let a = FieldSet::from_json_text(r#"{"Theme": 1}"#).unwrap();
        let b = FieldSet::from_json_text(r#"{"theme": 1}"#).unwrap();

        assert!(!a.matches(&b));
    }

    #[test]
    fn test_non_object_has_no_field_set() {
        assert!(FieldSet::from_json_text("[1, 2]").is_none());
        assert!(FieldSet::from_json_text("\"text\"").is_none());
        assert!(FieldSet::from_json_text("not json").is_none());
    }

    #[test]
    fn test_empty_object() {
        let set = FieldSet::from_json_text("{}").unwrap();
        assert!(set.is_empty());
    }
}
