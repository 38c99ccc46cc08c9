use dioxus::prelude::*;

use crate::scan::ScanView;
use crate::t;

#[component]
pub fn Scanner() -> Element {
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        div { style: "display:none", "{_lang_marker}" }
        section { class: "page page-scanner",
            h1 { {t!("page-scanner-title")} }
            p { {t!("page-scanner-intro")} }
            ScanView {}
        }
    }
}
