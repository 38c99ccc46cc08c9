//! Formatting helpers for presenting cells and gauge readings.

use serde_json::Value;
use time::macros::format_description;

use super::columns::{Column, ColumnKind};
use super::record::{number_of, parse_date, text_of};

/// Shown for missing, null or blank cells.
pub const EMPTY_CELL: &str = "-";

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return EMPTY_CELL.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.3}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// `DD/MM/YYYY`, with ` HH:MM` appended when the time isn't midnight.
pub fn format_date(value: &Value) -> Option<String> {
    let date = parse_date(value)?;
    let day = date
        .format(&format_description!("[day]/[month]/[year]"))
        .ok()?;
    if date.hour() == 0 && date.minute() == 0 {
        return Some(day);
    }
    let time = date.format(&format_description!("[hour]:[minute]")).ok()?;
    Some(format!("{day} {time}"))
}

/// Display text for one cell of `column`.
pub fn cell_text(column: &Column, value: Option<&Value>) -> String {
    let Some(value) = value else {
        return EMPTY_CELL.to_string();
    };

    if column.kind == ColumnKind::Date {
        if let Some(date) = format_date(value) {
            return date;
        }
    }

    match text_of(value) {
        Some(text) if !text.trim().is_empty() => text,
        _ => EMPTY_CELL.to_string(),
    }
}

/// Highlight bucket for a cell, numeric values between 0.7 and 1.0 are flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Plain,
    Numeric,
    Watch,
}

impl CellTone {
    pub fn of(value: Option<&Value>) -> Self {
        match value.and_then(number_of) {
            Some(n) if (0.7..=1.0).contains(&n) => Self::Watch,
            Some(_) => Self::Numeric,
            None => Self::Plain,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Plain => "data-table__cell--plain",
            Self::Numeric => "data-table__cell--numeric",
            Self::Watch => "data-table__cell--watch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(key: &str) -> Column {
        Column {
            key: key.to_string(),
            kind: ColumnKind::Field,
        }
    }

    #[test]
    fn numbers_drop_needless_decimals() {
        assert_eq!(format_number(70.0), "70");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333");
        assert_eq!(format_number(f64::NAN), "-");
    }

    #[test]
    fn blank_cells_show_a_dash() {
        let col = field("valor");
        assert_eq!(cell_text(&col, None), "-");
        assert_eq!(cell_text(&col, Some(&Value::Null)), "-");
        assert_eq!(cell_text(&col, Some(&json!("  "))), "-");
        assert_eq!(cell_text(&col, Some(&json!(0))), "0");
        assert_eq!(cell_text(&col, Some(&json!("L2"))), "L2");
    }

    #[test]
    fn date_cells_use_day_first_display() {
        let col = Column {
            key: "Fecha".to_string(),
            kind: ColumnKind::Date,
        };
        assert_eq!(cell_text(&col, Some(&json!("2024-01-05"))), "05/01/2024");
        assert_eq!(
            cell_text(&col, Some(&json!("2024-01-05T08:30:00"))),
            "05/01/2024 08:30"
        );
        assert_eq!(cell_text(&col, Some(&json!("pending"))), "pending");
    }

    #[test]
    fn tone_flags_the_watch_band() {
        assert_eq!(CellTone::of(Some(&json!(0.7))), CellTone::Watch);
        assert_eq!(CellTone::of(Some(&json!("1.0"))), CellTone::Watch);
        assert_eq!(CellTone::of(Some(&json!(1.01))), CellTone::Numeric);
        assert_eq!(CellTone::of(Some(&json!("abc"))), CellTone::Plain);
        assert_eq!(CellTone::of(None), CellTone::Plain);
    }
}
