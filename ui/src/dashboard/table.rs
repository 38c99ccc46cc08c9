use dioxus::prelude::*;

use crate::core::columns::{Column, ColumnKind};
use crate::core::format::{cell_text, CellTone};
use crate::core::record::Record;
use crate::core::table::{build_view, TableRow, TableState};
use crate::t;

/// Sortable, paginated record table. Sorting and paging never touch the
/// records themselves; each render derives the visible page afresh.
#[component]
pub fn RecordsTable(records: Vec<Record>, columns: Vec<Column>) -> Element {
    let mut state = use_signal(TableState::default);
    let view = build_view(&records, &columns, &state.read());
    let page = view.page;
    let total_pages = view.total_pages;

    rsx! {
        div { class: "data-table",
            div { class: "data-table__scroll",
                table {
                    thead {
                        tr {
                            for column in view.columns.iter() {
                                {header_cell(column, state)}
                            }
                        }
                    }
                    tbody {
                        for row in view.rows.iter() {
                            tr { key: "{row.number}",
                                for column in view.columns.iter() {
                                    {body_cell(row, column)}
                                }
                            }
                        }
                    }
                }
            }
            nav { class: "data-table__pager",
                button {
                    r#type: "button",
                    class: "button button--ghost data-table__page-btn",
                    disabled: page <= 1,
                    onclick: move |_| {
                        let previous = state.peek().previous_page();
                        state.set(previous);
                    },
                    {t!("table-previous")}
                }
                span { class: "data-table__page-info",
                    {t!("table-page", page = page, total = total_pages)}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost data-table__page-btn",
                    disabled: page >= total_pages,
                    onclick: move |_| {
                        let next = state.peek().next_page(total_pages);
                        state.set(next);
                    },
                    {t!("table-next")}
                }
            }
        }
    }
}

fn header_cell(column: &Column, mut state: Signal<TableState>) -> Element {
    let label = column.label().to_string();
    if !column.is_sortable() {
        return rsx! {
            th { class: "data-table__head data-table__head--index", "{label}" }
        };
    }

    let key = column.key.clone();
    let arrow = state
        .read()
        .sort_dir_for(&key)
        .map(|dir| dir.arrow())
        .unwrap_or_default();

    rsx! {
        th {
            class: "data-table__head data-table__head--sortable",
            onclick: move |_| {
                let next = state.peek().toggle_sort(&key);
                state.set(next);
            },
            "{label}"
            if !arrow.is_empty() {
                span { class: "data-table__arrow", " {arrow}" }
            }
        }
    }
}

fn body_cell(row: &TableRow, column: &Column) -> Element {
    if column.kind == ColumnKind::RowNumber {
        return rsx! {
            td { class: "data-table__cell data-table__cell--index", "{row.number}" }
        };
    }

    let value = row.value(column);
    let text = cell_text(column, value);
    let tone = if column.kind == ColumnKind::Date {
        CellTone::Plain
    } else {
        CellTone::of(value)
    };
    let class = format!("data-table__cell {}", tone.css_class());

    rsx! {
        td { class: "{class}", "{text}" }
    }
}
