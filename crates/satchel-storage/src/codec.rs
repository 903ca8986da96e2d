//! JSON encoding and decoding for stored values.
//!
//! Encoding is pretty-printed with stable indentation and writes every
//! field, including nulls. Decoding matches top-level field names
//! case-insensitively against the stored type's declared schema and fills
//! absent names from the type's default value, so the typed decode only
//! fails on genuinely mismatched content.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StorageError};
use crate::value::StoredValue;

/// Outcome of decoding text into a stored value.
///
/// Distinguishes unparseable input from structurally valid JSON that does
/// not fit the target type; callers branch on the variant instead of
/// catching an error mid-flight.
#[derive(Debug)]
pub enum Decoded<T> {
    /// Decoded successfully.
    Ok(T),
    /// Input is not well-formed JSON.
    MalformedInput(serde_json::Error),
    /// Input is well-formed JSON but does not fit the target type.
    TypeMismatch(serde_json::Error),
}

impl<T> Decoded<T> {
    /// The decoded value, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            Decoded::Ok(value) => Some(value),
            Decoded::MalformedInput(_) | Decoded::TypeMismatch(_) => None,
        }
    }
}

/// Encode a value as pretty-printed JSON.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| StorageError::Serialize { source: e })
}

/// Decode text into a stored value.
pub fn decode<T: StoredValue>(text: &str) -> Decoded<T> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => decode_value(value),
        Err(e) => Decoded::MalformedInput(e),
    }
}

/// Decode an already-parsed JSON value into a stored value.
pub fn decode_value<T: StoredValue>(mut value: Value) -> Decoded<T> {
    fold_field_names(&mut value, T::FIELDS);
    fill_missing_fields::<T>(&mut value);
    match serde_json::from_value(value) {
        Ok(decoded) => Decoded::Ok(decoded),
        Err(e) => Decoded::TypeMismatch(e),
    }
}

/// Rename top-level keys that differ from the schema only by ASCII case.
///
/// A key already spelled canonically wins over a case-folded duplicate.
fn fold_field_names(value: &mut Value, fields: &[&str]) {
    let Value::Object(map) = value else {
        return;
    };

    let keys: Vec<String> = map.keys().cloned().collect();
    for key in keys {
        if fields.contains(&key.as_str()) {
            continue;
        }
        let Some(canonical) = fields.iter().find(|f| f.eq_ignore_ascii_case(&key)) else {
            continue;
        };
        if map.contains_key(*canonical) {
            continue;
        }
        if let Some(entry) = map.shift_remove(&key) {
            map.insert((*canonical).to_string(), entry);
        }
    }
}

/// Insert default values for schema fields the document does not carry.
fn fill_missing_fields<T: StoredValue>(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    let Ok(Value::Object(defaults)) = serde_json::to_value(T::default()) else {
        return;
    };

    for (name, default) in defaults {
        if !map.contains_key(&name) {
            map.insert(name, default);
        }
    }
}
