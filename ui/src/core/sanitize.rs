//! Consolidates the reserved field into a single canonical key.
//!
//! Older payloads key the reserved field with an empty string, newer ones
//! with any spelling whose digits read `004` (`"004"`, `"col004"`, `"C 004"`).

use serde_json::Value;

use super::keys::digits_of;
use super::record::Record;

/// Stable key every reserved-field variant is moved to.
pub const CANONICAL_FIELD: &str = "canonical";

/// Header label shown for the canonical column.
pub const CANONICAL_LABEL: &str = "004";

const RESERVED_CODE: &str = "004";

pub fn is_reserved_key(key: &str) -> bool {
    key.trim().is_empty() || digits_of(key) == RESERVED_CODE
}

/// Rewrites one row: the first reserved variant wins the canonical slot, every
/// raw variant is dropped, other keys pass through in order.
pub fn sanitize(row: &Record) -> Record {
    let mut next = Record::with_capacity(row.len());
    let mut canonical_set = false;

    for (key, value) in row {
        if key == CANONICAL_FIELD || is_reserved_key(key) {
            if !canonical_set {
                next.insert(CANONICAL_FIELD.to_string(), value.clone());
                canonical_set = true;
            }
            continue;
        }
        next.insert(key.clone(), value.clone());
    }

    next
}

pub fn sanitize_all(rows: &[Record]) -> Vec<Record> {
    rows.iter().map(sanitize).collect()
}

pub fn canonical_value(row: &Record) -> Option<&Value> {
    row.get(CANONICAL_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test records are objects"),
        }
    }

    #[test]
    fn blank_key_moves_to_canonical() {
        let row = record(json!({ "": 4.2, "fecha": "2024-01-05" }));
        let clean = sanitize(&row);
        assert_eq!(canonical_value(&clean), Some(&json!(4.2)));
        assert!(!clean.contains_key(""));
        assert_eq!(clean.keys().collect::<Vec<_>>(), vec!["canonical", "fecha"]);
    }

    #[test]
    fn first_variant_wins_and_all_variants_are_dropped() {
        let row = record(json!({ "fecha": "x", "col004": 1, "  ": 2, "004": 3 }));
        let clean = sanitize(&row);
        assert_eq!(canonical_value(&clean), Some(&json!(1)));
        assert_eq!(clean.len(), 2);
        for raw in ["col004", "  ", "004"] {
            assert!(!clean.contains_key(raw), "{raw} should be removed");
        }
    }

    #[test]
    fn blank_before_reserved_code_wins() {
        let row = record(json!({ "": "blank", "C-004": "coded" }));
        assert_eq!(canonical_value(&sanitize(&row)), Some(&json!("blank")));
    }

    #[test]
    fn null_values_still_claim_the_slot() {
        let row = record(json!({ "": null, "004": 9 }));
        assert_eq!(canonical_value(&sanitize(&row)), Some(&Value::Null));
    }

    #[test]
    fn other_digit_codes_pass_through() {
        let row = record(json!({ "0040": 1, "col04": 2, "4": 3 }));
        assert_eq!(sanitize(&row), row);
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        let row = record(json!({ "a": 1, "": 2, "b004": 3 }));
        let once = sanitize(&row);
        assert_eq!(sanitize(&once), once);
    }
}
