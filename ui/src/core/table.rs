//! Sorted, paginated projection of a sanitized record set.
//!
//! `TableState` is the only mutable input. Views keep one in a signal and
//! replace it with the value returned by `toggle_sort` / `go_to` etc., so the
//! whole pipeline stays testable without a renderer.

use std::cmp::Ordering;

use serde_json::Value;

use super::columns::{date_value, is_date_field, Column, ColumnKind};
use super::record::{date_rank, number_of, text_of, Record};
use super::sanitize::CANONICAL_FIELD;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub dir: SortDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    /// 1-based; clamped against the record count when the view is built.
    pub page: usize,
    pub sort: Option<SortSpec>,
}

impl Default for TableState {
    fn default() -> Self {
        Self { page: 1, sort: None }
    }
}

impl TableState {
    /// Same key flips the direction, a new key starts ascending. Either way
    /// the view returns to the first page.
    pub fn toggle_sort(&self, key: &str) -> Self {
        let sort = match &self.sort {
            Some(current) if current.key == key => SortSpec {
                key: current.key.clone(),
                dir: current.dir.flipped(),
            },
            _ => SortSpec {
                key: key.to_string(),
                dir: SortDir::Asc,
            },
        };
        Self {
            page: 1,
            sort: Some(sort),
        }
    }

    pub fn go_to(&self, page: usize) -> Self {
        Self {
            page,
            sort: self.sort.clone(),
        }
    }

    pub fn next_page(&self, total_pages: usize) -> Self {
        self.go_to((self.page + 1).min(total_pages.max(1)))
    }

    pub fn previous_page(&self) -> Self {
        self.go_to(self.page.saturating_sub(1).max(1))
    }

    pub fn sort_dir_for(&self, key: &str) -> Option<SortDir> {
        self.sort
            .as_ref()
            .filter(|sort| sort.key == key)
            .map(|sort| sort.dir)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Global 1-based position in the current ordering.
    pub number: usize,
    pub record: Record,
}

impl TableRow {
    pub fn value(&self, column: &Column) -> Option<&Value> {
        match column.kind {
            ColumnKind::RowNumber => None,
            ColumnKind::Date => self
                .record
                .get(&column.key)
                .or_else(|| date_value(&self.record)),
            _ => self.record.get(&column.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

pub fn total_pages(record_count: usize, page_size: usize) -> usize {
    record_count.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub fn build_view(records: &[Record], columns: &[Column], state: &TableState) -> TableView {
    build_view_with_page_size(records, columns, state, PAGE_SIZE)
}

pub fn build_view_with_page_size(
    records: &[Record],
    columns: &[Column],
    state: &TableState,
    page_size: usize,
) -> TableView {
    let page_size = page_size.max(1);
    let ordered = sort_records(records, state.sort.as_ref());

    let total_records = ordered.len();
    let total_pages = total_pages(total_records, page_size);
    let page = clamp_page(state.page, total_pages);
    let offset = (page - 1) * page_size;

    let rows = ordered
        .into_iter()
        .skip(offset)
        .take(page_size)
        .enumerate()
        .map(|(index, record)| TableRow {
            number: offset + index + 1,
            record: record.clone(),
        })
        .collect();

    TableView {
        columns: columns.to_vec(),
        rows,
        page,
        total_pages,
        total_records,
    }
}

/// Stable ordering of `records`; newest date first when no sort is chosen.
pub fn sort_records<'a>(records: &'a [Record], sort: Option<&SortSpec>) -> Vec<&'a Record> {
    let mut ordered: Vec<&Record> = records.iter().collect();

    match sort {
        None => ordered.sort_by(|a, b| record_date_rank(b).cmp(&record_date_rank(a))),
        Some(spec) => {
            ordered.sort_by(|a, b| {
                let ordering =
                    compare_field(&spec.key, sort_cell(a, &spec.key), sort_cell(b, &spec.key));
                match spec.dir {
                    SortDir::Asc => ordering,
                    SortDir::Desc => ordering.reverse(),
                }
            });
        }
    }

    ordered
}

fn record_date_rank(record: &Record) -> i64 {
    date_rank(date_value(record))
}

fn sort_cell<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    match record.get(key) {
        None if is_date_field(key) => date_value(record),
        cell => cell,
    }
}

/// Sort bucket of a general cell: numbers, then text, then blanks.
#[derive(Debug, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
    Missing,
}

impl SortValue {
    fn of(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::Missing;
        };
        if let Some(number) = number_of(value) {
            return Self::Number(number);
        }
        match text_of(value) {
            Some(text) if !text.trim().is_empty() => Self::Text(text),
            _ => Self::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Missing => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => natural_cmp(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Comparison used for an explicit sort on `key`.
///
/// Other columns rank numeric cells before text and blanks last, so a column
/// mixing `1.5` with `1.10x` still sorts under one consistent order.
pub fn compare_field(key: &str, a: Option<&Value>, b: Option<&Value>) -> Ordering {
    if key == CANONICAL_FIELD {
        let left = a.and_then(number_of).unwrap_or(f64::NEG_INFINITY);
        let right = b.and_then(number_of).unwrap_or(f64::NEG_INFINITY);
        return left.total_cmp(&right);
    }

    if is_date_field(key) {
        return date_rank(a).cmp(&date_rank(b));
    }

    SortValue::of(a).compare(&SortValue::of(b))
}

/// Case-insensitive comparison that orders digit runs by numeric value
/// (`"L2" < "L10"`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }

    // Only case differed; keep the result deterministic.
    a.cmp(b)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
