use dioxus::prelude::*;

use crate::core::format::format_percent;
use crate::core::limits::GaugeReading;
use crate::t;

const CENTER: f64 = 60.0;
const RADIUS: f64 = 48.0;
const SWEEP_START: f64 = -135.0;
const SWEEP_END: f64 = 135.0;

/// SVG path for an arc on the gauge circle. Angles are degrees clockwise
/// from twelve o'clock.
pub fn arc_path(start_deg: f64, end_deg: f64) -> String {
    let (x1, y1) = point_at(start_deg);
    let (x2, y2) = point_at(end_deg);
    let large_arc = u8::from(end_deg - start_deg > 180.0);
    format!("M {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2}")
}

/// Filled portion of the dial for `percentage` in 0..=100.
pub fn value_arc(percentage: f64) -> Option<String> {
    if !percentage.is_finite() || percentage <= 0.0 {
        return None;
    }
    let fraction = percentage.min(100.0) / 100.0;
    Some(arc_path(
        SWEEP_START,
        SWEEP_START + (SWEEP_END - SWEEP_START) * fraction,
    ))
}

fn point_at(deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (CENTER + RADIUS * rad.sin(), CENTER - RADIUS * rad.cos())
}

#[component]
pub fn GaugePanel(gauges: Vec<GaugeReading>) -> Element {
    rsx! {
        div { class: "gauges",
            h3 { {t!("dashboard-gauges-title")} }
            div { class: "gauges__grid",
                for (index, reading) in gauges.into_iter().enumerate() {
                    Gauge { key: "{index}", reading }
                }
            }
        }
    }
}

#[component]
fn Gauge(reading: GaugeReading) -> Element {
    let status_class = match (reading.has_value(), reading.in_range) {
        (false, _) => "gauge gauge--empty",
        (true, true) => "gauge gauge--ok",
        (true, false) => "gauge gauge--alert",
    };
    let status = match (reading.has_value(), reading.in_range) {
        (false, _) => t!("gauge-no-value"),
        (true, true) => t!("gauge-in-range"),
        (true, false) => t!("gauge-out-of-range"),
    };
    let track = arc_path(SWEEP_START, SWEEP_END);
    let fill = value_arc(reading.percentage);
    let percent = format_percent(reading.percentage);
    let value = reading.value_text();
    let limits = t!("gauge-limits", bounds = reading.bounds_text());

    rsx! {
        figure { class: status_class,
            svg {
                class: "gauge__dial",
                view_box: "0 0 120 120",
                "role": "img",
                "aria-label": "{reading.label}: {value}",
                path { class: "gauge__track", d: "{track}" }
                if let Some(fill) = fill {
                    path { class: "gauge__fill", d: "{fill}" }
                }
                text { class: "gauge__value", x: "60", y: "64", text_anchor: "middle", "{value}" }
                text { class: "gauge__percent", x: "60", y: "82", text_anchor: "middle", "{percent}" }
            }
            figcaption { class: "gauge__caption",
                strong { class: "gauge__label", "{reading.label}" }
                span { class: "gauge__limits", "{limits}" }
                span { class: "gauge__status", "{status}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sweep_uses_the_large_arc() {
        assert_eq!(
            arc_path(SWEEP_START, SWEEP_END),
            "M 26.06 93.94 A 48 48 0 1 1 93.94 93.94"
        );
    }

    #[test]
    fn half_reading_ends_at_the_top() {
        let path = value_arc(50.0).unwrap();
        assert!(path.starts_with("M 26.06 93.94"));
        assert!(path.contains(" 0 0 1 "));
        assert!(path.ends_with("60.00 12.00"));
    }

    #[test]
    fn empty_or_invalid_readings_draw_nothing() {
        assert!(value_arc(0.0).is_none());
        assert!(value_arc(f64::NAN).is_none());
        assert_eq!(value_arc(250.0), value_arc(100.0));
    }
}
