//! Sampling a representative sub-object out of nested JSON.

use serde_json::Value;

use crate::codec::{self, Decoded};
use crate::value::StoredValue;

/// Pull a representative sub-object out of `data` under `root_element`.
///
/// Settings documents often nest their real payload a level or two deep (a
/// list of per-plugin entries, a map keyed by id). This samples the first
/// entry of that payload and decodes it as `T`, giving drift comparison a
/// shape reference.
///
/// Rules:
/// - an empty `root_element` returns `data` unchanged;
/// - when the serialized root is not an object, there is nothing to sample;
/// - `root_element` selects the named property when present, otherwise the
///   root itself is sampled;
/// - an array target yields its first entry, an object target yields its
///   first property's value in insertion order (objects only);
/// - any parse or decode failure is logged and reported as `None`.
pub fn extract_fields<T: StoredValue>(data: T, root_element: &str) -> Option<T> {
    if root_element.is_empty() {
        return Some(data);
    }

    let serialized = match codec::encode(&data) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to serialize data for field extraction: {e}");
            return None;
        }
    };

    let root: Value = match serde_json::from_str(&serialized) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to parse serialized data for field extraction: {e}");
            return None;
        }
    };

    let Value::Object(fields) = &root else {
        return None;
    };

    let target = fields.get(root_element).unwrap_or(&root);

    let element = match target {
        Value::Array(entries) => entries.first()?.clone(),
        Value::Object(map) => {
            let (_, first) = map.iter().next()?;
            if !first.is_object() {
                return None;
            }
            first.clone()
        }
        _ => return None,
    };

    match codec::decode_value(element) {
        Decoded::Ok(value) => Some(value),
        Decoded::MalformedInput(e) | Decoded::TypeMismatch(e) => {
            tracing::error!("Failed to decode extracted element: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::PluginDoc;
    use std::collections::BTreeMap;

    fn doc_with_items() -> PluginDoc {
        PluginDoc {
            x: 0,
            items: vec![
                PluginDoc {
                    x: 1,
                    ..PluginDoc::default()
                },
                PluginDoc {
                    x: 2,
                    ..PluginDoc::default()
                },
            ],
            groups: BTreeMap::new(),
        }
    }

    #[test]
    fn test_samples_first_entry_of_named_array() {
        let extracted = extract_fields(doc_with_items(), "items").unwrap();
        assert_eq!(extracted.x, 1);
    }

    #[test]
    fn test_empty_root_name_returns_data_unchanged() {
        let data = doc_with_items();
        let extracted = extract_fields(data.clone(), "").unwrap();
        assert_eq!(extracted, data);
    }

    #[test]
    fn test_samples_first_property_of_named_object() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "alpha".to_string(),
            PluginDoc {
                x: 7,
                ..PluginDoc::default()
            },
        );
        let data = PluginDoc {
            x: 0,
            items: Vec::new(),
            groups,
        };

        let extracted = extract_fields(data, "groups").unwrap();
        assert_eq!(extracted.x, 7);
    }

    #[test]
    fn test_missing_root_samples_the_root_object_itself() {
        // First property of the root in insertion order is the scalar `x`,
        // which is not an object.
        assert!(extract_fields(doc_with_items(), "widgets").is_none());
    }

    #[test]
    fn test_empty_array_yields_nothing() {
        let data = PluginDoc::default();
        assert!(extract_fields(data, "items").is_none());
    }

    #[test]
    fn test_non_object_root_yields_nothing() {
        use crate::testutil::IdList;

        let data = IdList(vec![1, 2, 3]);
        assert!(extract_fields(data, "items").is_none());
    }
}
