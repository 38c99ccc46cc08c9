//! Payload shapes returned by the data endpoint, plus lenient value parsing.
//!
//! The endpoint has shipped three shapes over time:
//! - a single flat object (one record),
//! - an array of flat objects (legacy "batch" shape),
//! - `{ "limits": [...], "allRecords": [...] }` (dashboard shape).
//!
//! Records keep the key order of the JSON source; first-match rules elsewhere
//! depend on it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time,
};

use super::keys::normalize;

/// One fetched row keyed by (arbitrarily spelled) field name.
pub type Record = Map<String, Value>;

/// A named bound pair used to classify one field of the latest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default, alias = "CARACTERISTICAID", deserialize_with = "lenient_text")]
    pub caracteristicaid: String,
    #[serde(default = "nan", alias = "LIE", deserialize_with = "lenient_number")]
    pub lie: f64,
    #[serde(default = "nan", alias = "LSE", deserialize_with = "lenient_number")]
    pub lse: f64,
    #[serde(default, alias = "CRITICA", deserialize_with = "lenient_text")]
    pub critica: String,
}

impl Limit {
    pub fn is_critical(&self) -> bool {
        self.critica.trim() == "1"
    }

    /// `(low, high)` regardless of how `lie`/`lse` were ordered upstream.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lie.min(self.lse), self.lie.max(self.lse))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(Record),
    Batch(Vec<Record>),
    Dashboard {
        limits: Vec<Limit>,
        records: Vec<Record>,
    },
}

impl Default for Payload {
    fn default() -> Self {
        Self::Batch(Vec::new())
    }
}

impl Payload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Batch(records_from(items)),
            Value::Object(mut object) => {
                let records_key = shape_key(&object, "ALLRECORDS");
                let limits_key = shape_key(&object, "LIMITS");

                match records_key {
                    Some(records_key) => {
                        let records = match object.remove(&records_key) {
                            Some(Value::Array(items)) => records_from(items),
                            Some(Value::Object(single)) => vec![single],
                            _ => Vec::new(),
                        };
                        let limits = limits_key
                            .and_then(|key| object.remove(&key))
                            .map(limits_from)
                            .unwrap_or_default();
                        Self::Dashboard { limits, records }
                    }
                    None => Self::Single(object),
                }
            }
            other => {
                tracing::warn!(kind = value_kind(&other), "unexpected payload shape");
                Self::default()
            }
        }
    }

    pub fn records(&self) -> &[Record] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Batch(records) => records,
            Self::Dashboard { records, .. } => records,
        }
    }

    pub fn limits(&self) -> &[Limit] {
        match self {
            Self::Dashboard { limits, .. } => limits,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

fn shape_key(object: &Record, wanted: &str) -> Option<String> {
    object.keys().find(|key| normalize(key) == wanted).cloned()
}

fn records_from(items: Vec<Value>) -> Vec<Record> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}

fn limits_from(value: Value) -> Vec<Limit> {
    let items = match value {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Limit>(item) {
            Ok(limit) => Some(limit),
            Err(err) => {
                tracing::warn!(%err, "skipping malformed limit");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_of(&value).unwrap_or(f64::NAN))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Numeric reading of a cell: JSON numbers, or strings that parse as a float.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
        _ => None,
    }
}

/// Plain-text reading of a cell, `None` for null.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(match number.as_f64() {
            Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
            _ => number.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Parse the date cell formats seen in payloads. Times without an offset are
/// read as UTC.
pub fn parse_date(value: &Value) -> Option<OffsetDateTime> {
    let raw = match value {
        Value::String(text) => text.trim(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }

    let datetime_formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!(
            "[day padding:none]/[month padding:none]/[year] [hour padding:none]:[minute]:[second]"
        ),
        format_description!("[day padding:none]/[month padding:none]/[year] [hour padding:none]:[minute]"),
    ];
    for format in datetime_formats {
        if let Ok(parsed) = PrimitiveDateTime::parse(raw, &format) {
            return Some(parsed.assume_utc());
        }
    }

    let date_formats = [
        format_description!("[year]-[month]-[day]"),
        format_description!("[day padding:none]/[month padding:none]/[year]"),
    ];
    for format in date_formats {
        if let Ok(parsed) = Date::parse(raw, &format) {
            return Some(PrimitiveDateTime::new(parsed, Time::MIDNIGHT).assume_utc());
        }
    }

    None
}

/// Sort key for dates: unix seconds, missing or unparseable dates sit at the epoch.
pub fn date_rank(value: Option<&Value>) -> i64 {
    value
        .and_then(parse_date)
        .map(|date| date.unix_timestamp())
        .unwrap_or(0)
}
