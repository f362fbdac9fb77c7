//! Ordered merging of partial settings records.

use super::types::{field_is_valid, PartialRecord};
use serde_json::Value;

/// Merges records left to right; for every top-level key the last record
/// that has it wins.
///
/// Values are replaced whole. Nested objects such as `plan` are never merged
/// field by field.
pub fn merge_records(records: &[PartialRecord]) -> PartialRecord {
    records
        .iter()
        .fold(PartialRecord::new(), |mut merged, record| {
            for (key, value) in record {
                merged.insert(key.clone(), value.clone());
            }
            merged
        })
}

/// Reduces a raw persisted blob to the fields that can be trusted.
///
/// Anything that isn't an object counts as empty. Known fields with an
/// unusable value are dropped so that defaults take their place; unknown
/// fields pass through untouched.
pub fn sanitize_record(raw: Option<&Value>) -> PartialRecord {
    let record = match raw {
        Some(Value::Object(record)) => record,
        Some(Value::Null) | None => return PartialRecord::new(),
        Some(other) => {
            tracing::warn!("Ignoring persisted settings that are not an object: {}", other);
            return PartialRecord::new();
        }
    };

    record
        .iter()
        .filter(|(key, value)| {
            let valid = field_is_valid(key, value);
            if !valid {
                tracing::warn!("Dropping invalid persisted settings field '{}': {}", key, value);
            }
            valid
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
