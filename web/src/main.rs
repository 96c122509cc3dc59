use dioxus::prelude::*;

use ui::components::{register_nav, AppNavbar, NavBuilder};
use ui::core::config::DashboardConfig;
use ui::views::Dashboard;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Dashboard {},
}

/// Plotly is loaded from its CDN; the chart panel calls into the global `Plotly`.
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Dashboard {},
        "{label}"
    })
}

fn main() {
    if let Err(err) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("logger init failed: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        dashboard: nav_dashboard,
    });

    // Panels subscribe to this signal so a locale switch re-renders them.
    use_context_provider(|| Signal::new(ui::i18n::current_language()));

    rsx! {
        document::Link { rel: "stylesheet", href: ui::THEME_CSS }
        document::Script { src: PLOTLY_JS }

        Router::<Route> {}
    }
}

/// Web layout around the shared navbar, so links can use this crate's `Route`.
#[component]
fn WebNavbar() -> Element {
    let lab_code = use_hook(|| {
        DashboardConfig::from_page_context()
            .ok()
            .map(|config| config.lab_code().to_string())
    });

    rsx! {
        AppNavbar { lab_code }
        Outlet::<Route> {}
    }
}
