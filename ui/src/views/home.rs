use dioxus::prelude::*;

use crate::components::app_navbar::scanner_link;
use crate::t;

#[component]
pub fn Home() -> Element {
    // Subscribe to the global language code so copy refreshes on switch.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let cta = scanner_link(&t!("home-cta"));

    rsx! {
        div { style: "display:none", "{_lang_marker}" }
        section { class: "page page-home",
            h1 { {t!("home-title")} }
            p { class: "page-home__tagline", {t!("home-tagline")} }
            p { {t!("home-intro")} }

            ul { class: "page-home__features",
                li { {t!("home-feature-scan")} }
                li { {t!("home-feature-gauges")} }
                li { {t!("home-feature-table")} }
            }
            if let Some(cta) = cta {
                p { class: "page-home__cta", {cta} }
            }
        }
    }
}
