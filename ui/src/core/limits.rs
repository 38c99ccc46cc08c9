//! Matches critical limits to fields of the latest record and classifies them.

use serde_json::Value;

use super::columns::date_value;
use super::format::format_number;
use super::keys::find_key;
use super::range::classify;
use super::record::{date_rank, number_of, text_of, Limit, Record};

/// Value of the field `limit` names, alias match first, digit residue second.
pub fn find_value<'a>(record: &'a Record, limit: &Limit) -> Option<&'a Value> {
    let key = find_key(record, &limit.caracteristicaid)?;
    record.get(key)
}

/// Record with the most recent date.
///
/// The data endpoint does not promise any row order, so the payload's first
/// or last row is not necessarily the newest. The greatest parsed date wins
/// and rows with equal dates keep payload order, the earliest one winning.
pub fn latest_record(records: &[Record]) -> Option<&Record> {
    let mut latest: Option<(&Record, i64)> = None;
    for record in records {
        let rank = date_rank(date_value(record));
        match latest {
            Some((_, best)) if best >= rank => {}
            _ => latest = Some((record, rank)),
        }
    }
    latest.map(|(record, _)| record)
}

/// Inputs for one status gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReading {
    pub label: String,
    /// Numeric reading; `None` renders the "no value" state.
    pub value: Option<f64>,
    /// Raw cell text for display when the value isn't numeric.
    pub display: Option<String>,
    pub percentage: f64,
    pub in_range: bool,
    pub low: f64,
    pub high: f64,
}

impl GaugeReading {
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value_text(&self) -> String {
        match (self.value, self.display.as_deref()) {
            (Some(value), _) => format_number(value),
            (None, Some(raw)) if !raw.trim().is_empty() => raw.to_string(),
            _ => "-".to_string(),
        }
    }

    pub fn bounds_text(&self) -> String {
        if self.low.is_finite() && self.high.is_finite() {
            format!("{} – {}", format_number(self.low), format_number(self.high))
        } else {
            "-".to_string()
        }
    }
}

pub fn reading_for(limit: &Limit, latest: Option<&Record>) -> GaugeReading {
    let (low, high) = limit.bounds();
    let raw = latest.and_then(|record| find_value(record, limit));
    let value = raw.and_then(number_of);
    let classification = classify(value.unwrap_or(f64::NAN), low, high);

    GaugeReading {
        label: limit.caracteristicaid.trim().to_string(),
        value,
        display: raw.and_then(text_of),
        percentage: classification.percentage,
        in_range: classification.in_range,
        low,
        high,
    }
}

/// One reading per critical limit, in limit order.
pub fn build_gauges(limits: &[Limit], latest: Option<&Record>) -> Vec<GaugeReading> {
    let readings: Vec<GaugeReading> = limits
        .iter()
        .filter(|limit| limit.is_critical())
        .map(|limit| reading_for(limit, latest))
        .collect();

    let missing = readings.iter().filter(|r| !r.has_value()).count();
    if missing > 0 {
        tracing::debug!(missing, total = readings.len(), "critical limits without a value");
    }

    readings
}
