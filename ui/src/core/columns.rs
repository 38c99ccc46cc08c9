//! Column projection across a sanitized record set.

use std::collections::HashSet;

use super::keys::normalize;
use serde_json::Value;

use super::record::Record;
use super::sanitize::{CANONICAL_FIELD, CANONICAL_LABEL};

/// Administrative fields never shown as columns (normalized, exact match).
pub const HIDDEN_FIELDS: &[&str] = &[
    "ESTACIONID",
    "MAQUINAID",
    "PRODUCTOID",
    "CRITICA",
    "LIE",
    "LSE",
    "CARACTERISTICAID",
    "PRESION",
    "PRESIÓN",
];

/// Normalized name of the timestamp field.
pub const DATE_FIELD: &str = "FECHA";

/// Header label of the synthetic sequence column.
pub const ROW_NUMBER_LABEL: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    RowNumber,
    Date,
    Canonical,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Record key the column reads; empty for the row-number column.
    pub key: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn row_number() -> Self {
        Self {
            key: String::new(),
            kind: ColumnKind::RowNumber,
        }
    }

    pub fn label(&self) -> &str {
        match self.kind {
            ColumnKind::RowNumber => ROW_NUMBER_LABEL,
            ColumnKind::Canonical => CANONICAL_LABEL,
            ColumnKind::Date | ColumnKind::Field => self.key.as_str(),
        }
    }

    pub fn is_sortable(&self) -> bool {
        self.kind != ColumnKind::RowNumber
    }
}

pub fn is_hidden_field(key: &str) -> bool {
    let normalized = normalize(key);
    HIDDEN_FIELDS.contains(&normalized.as_str())
}

pub fn is_date_field(key: &str) -> bool {
    normalize(key) == DATE_FIELD
}

/// First key of the record naming the timestamp field.
pub fn date_key(record: &Record) -> Option<&str> {
    record
        .keys()
        .find(|key| is_date_field(key))
        .map(String::as_str)
}

/// Timestamp cell of the record under whichever spelling it uses.
pub fn date_value(record: &Record) -> Option<&Value> {
    date_key(record).and_then(|key| record.get(key))
}

/// Row number, date, canonical field, then every other visible key sorted.
///
/// Every spelling of the timestamp field folds into one date column keyed by
/// the first spelling seen; rows using another spelling still fill it.
pub fn project_columns(rows: &[Record]) -> Vec<Column> {
    let mut seen = HashSet::new();
    let mut union = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                union.push(key.as_str());
            }
        }
    }

    let mut date = None;
    let mut canonical = None;
    let mut rest = Vec::new();

    for key in union {
        if is_hidden_field(key) {
            continue;
        }
        if key == CANONICAL_FIELD {
            canonical = Some(key);
        } else if is_date_field(key) {
            date.get_or_insert(key);
        } else {
            rest.push(key);
        }
    }
    rest.sort_unstable();

    let mut columns = Vec::with_capacity(rest.len() + 3);
    columns.push(Column::row_number());
    if let Some(key) = date {
        columns.push(Column {
            key: key.to_string(),
            kind: ColumnKind::Date,
        });
    }
    if let Some(key) = canonical {
        columns.push(Column {
            key: key.to_string(),
            kind: ColumnKind::Canonical,
        });
    }
    columns.extend(rest.into_iter().map(|key| Column {
        key: key.to_string(),
        kind: ColumnKind::Field,
    }));

    columns
}
