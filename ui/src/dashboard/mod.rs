//! Results dashboard: critical-limit gauges above the paginated record table.

use dioxus::prelude::*;

use crate::core::columns::{project_columns, Column};
use crate::core::limits::{build_gauges, latest_record, GaugeReading};
use crate::core::record::{Payload, Record};
use crate::core::sanitize::sanitize_all;
use crate::t;

mod gauges;
mod table;

pub use gauges::GaugePanel;
pub use table::RecordsTable;

/// Everything the dashboard renders, derived from one fetched payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub records: Vec<Record>,
    pub columns: Vec<Column>,
    pub gauges: Vec<GaugeReading>,
}

impl DashboardState {
    pub fn from_payload(payload: &Payload) -> Self {
        let raw = payload.records();
        let records = sanitize_all(raw);
        let columns = project_columns(&records);
        // Limits are matched against the unsanitized record so that fields
        // folded into the canonical column can still be found.
        let gauges = build_gauges(payload.limits(), latest_record(raw));

        Self {
            records,
            columns,
            gauges,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[component]
pub fn RecordsDashboard(payload: Payload) -> Element {
    let state = DashboardState::from_payload(&payload);

    if state.is_empty() {
        return rsx! {
            section { class: "dashboard dashboard--empty",
                p { {t!("dashboard-empty")} }
            }
        };
    }

    let record_count = state.records.len();

    rsx! {
        section { class: "dashboard",
            if !state.gauges.is_empty() {
                GaugePanel { gauges: state.gauges.clone() }
            }
            div { class: "dashboard__records",
                h3 { {t!("dashboard-records-title")} }
                p { class: "dashboard__count", {t!("dashboard-record-count", count = record_count)} }
                RecordsTable { records: state.records.clone(), columns: state.columns.clone() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::ColumnKind;
    use crate::core::sanitize::CANONICAL_FIELD;
    use serde_json::json;

    #[test]
    fn dashboard_payload_yields_gauges_and_clean_columns() {
        let payload = Payload::from_value(json!({
            "limits": [
                { "caracteristicaid": "Temp", "lie": 70, "lse": 80, "critica": "1" },
                { "caracteristicaid": "Peso", "lie": 1, "lse": 2, "critica": "0" }
            ],
            "allRecords": [
                { "Fecha": "2024-01-01", "col004": 1, "Temp": 72, "LIE": 70, "MaquinaId": 3 },
                { "Fecha": "2024-01-03", "col004": 2, "Temp": 81, "LIE": 70, "MaquinaId": 3 }
            ]
        }));

        let state = DashboardState::from_payload(&payload);

        assert_eq!(state.records.len(), 2);
        assert_eq!(state.gauges.len(), 1);
        assert_eq!(state.gauges[0].value, Some(81.0));
        assert!(!state.gauges[0].in_range);

        let kinds: Vec<ColumnKind> = state.columns.iter().map(|c| c.kind).collect();
        assert_eq!(kinds[0], ColumnKind::RowNumber);
        assert!(state.columns.iter().any(|c| c.key == CANONICAL_FIELD));
        assert!(!state.columns.iter().any(|c| c.key == "LIE" || c.key == "MaquinaId"));
    }

    #[test]
    fn plain_list_has_no_gauges() {
        let payload = Payload::from_value(json!([{ "Fecha": "2024-01-01", "x": 1 }]));
        let state = DashboardState::from_payload(&payload);
        assert!(state.gauges.is_empty());
        assert!(!state.is_empty());
    }

    #[test]
    fn empty_payload_is_empty() {
        assert!(DashboardState::from_payload(&Payload::default()).is_empty());
    }
}
