//! Field-name matching for payloads whose key spelling drifts between versions.
//!
//! Two rules, always tried in this order when looking a field up:
//! 1. alias: normalized names are equal, or either contains the other;
//! 2. digit residue: the digits left after stripping everything else are equal.
//!
//! Within a rule the first key in the record's enumeration order wins.

use super::record::Record;

/// Trimmed, upper-cased form used for every key comparison.
pub fn normalize(key: &str) -> String {
    key.trim().to_uppercase()
}

/// Equality or containment (either direction) of the normalized forms.
///
/// An empty normalized side only matches another empty side; otherwise a
/// blank key would contain-match everything.
pub fn matches_alias(candidate: &str, target: &str) -> bool {
    let candidate = normalize(candidate);
    let target = normalize(target);

    if candidate.is_empty() || target.is_empty() {
        return candidate == target;
    }

    candidate == target || candidate.contains(&target) || target.contains(&candidate)
}

pub fn digits_of(key: &str) -> String {
    key.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// First key of `record` matching `target`, alias rule first, digit residue second.
pub fn find_key<'a>(record: &'a Record, target: &str) -> Option<&'a str> {
    if let Some(key) = record.keys().find(|key| matches_alias(key, target)) {
        return Some(key.as_str());
    }

    let wanted = digits_of(target);
    if wanted.is_empty() {
        return None;
    }

    record
        .keys()
        .find(|key| digits_of(key) == wanted)
        .map(String::as_str)
}
