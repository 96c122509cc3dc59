//! Shared UI crate for QC Board: the dashboard controller, its panels and
//! the views the platform crates route to.

pub mod core;
pub mod i18n;
pub mod panels;
pub mod views;

use dioxus::prelude::manganis;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

/// Shared dashboard stylesheet, linked once by the platform crate.
pub const THEME_CSS: dioxus::prelude::Asset = dioxus::prelude::asset!("/assets/theme/main.css");
