//! Shared UI crate for FSQC: the scan pipeline, the results dashboard and the
//! views both platform launchers route to.

pub mod config;
pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod scan;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
