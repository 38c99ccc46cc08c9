use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Home, Scanner};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/scanner")]
    Scanner {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Provides the global `Html5Qrcode` the camera backend binds to.
const QR_LIBRARY: &str = "https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js";

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn nav_scanner(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Scanner {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        home: nav_home,
        scanner: nav_scanner,
    });

    let lang_code = use_signal(ui::i18n::current_language);
    use_context_provider(|| lang_code);

    rsx! {
        document::Title { "FSQC" }
        document::Style { "{MAIN_CSS_INLINE}" }
        document::Script { src: QR_LIBRARY }

        Router::<Route> {}
    }
}

/// Web `Route` layout around the shared navbar.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
