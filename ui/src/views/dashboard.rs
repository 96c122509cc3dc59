use std::rc::Rc;

use api::LabClient;
use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::core::config::DashboardConfig;
use crate::core::controller::{DashboardController, DashboardEvent};
use crate::core::refresh::{self, RefreshCycle};
use crate::core::{platform, timing};
use crate::panels::{
    use_dashboard_signals, ChartPanel, FilterPanel, SignalSurface, StatisticsPanel, TablePanel,
};
use crate::t;

type Controller = DashboardController<LabClient, SignalSurface>;

#[component]
pub fn Dashboard() -> Element {
    let config = use_hook(DashboardConfig::from_page_context);

    match config {
        Ok(config) => rsx! {
            DashboardPage { config }
        },
        Err(err) => {
            tracing::error!("dashboard unavailable: {err}");
            rsx! {
                section { class: "page qc-page",
                    div { class: "qc-alert qc-alert--error",
                        {t!("config-missing", reason = err.to_string())}
                    }
                }
            }
        }
    }
}

#[component]
fn DashboardPage(config: DashboardConfig) -> Element {
    #[cfg(debug_assertions)]
    tracing::trace!(lab = config.lab_code(), "dashboard render");

    let signals = use_dashboard_signals();
    let controller: Rc<Controller> = use_hook(|| {
        let client = LabClient::new(config.routes.clone());
        Rc::new(DashboardController::new(
            client,
            SignalSurface::new(signals),
            config.clone(),
        ))
    });

    // Each event gets its own task so a slow fetch never holds up the next
    // click or the refresh timer.
    let events = use_coroutine({
        let controller = controller.clone();
        move |mut rx: UnboundedReceiver<DashboardEvent>| {
            let controller = controller.clone();
            async move {
                while let Some(event) = rx.next().await {
                    let controller = controller.clone();
                    platform::spawn_future(async move { controller.handle(event).await });
                }
            }
        }
    });

    let _visibility = use_hook({
        let controller = controller.clone();
        move || {
            events.send(DashboardEvent::Initialize);
            spawn_refresh(controller.clone(), controller.start_auto_refresh());

            Rc::new(platform::VisibilityListener::install(move |visible| {
                if let Some(cycle) = controller.visibility_changed(visible) {
                    spawn_refresh(controller.clone(), cycle);
                }
            }))
        }
    });

    use_drop({
        let controller = controller.clone();
        move || controller.stop_auto_refresh()
    });

    let on_event = EventHandler::new(move |event: DashboardEvent| events.send(event));
    let image_filename = controller.chart_image_filename(timing::today());
    let lab_code = config.lab_code().to_string();

    rsx! {
        section { class: "page qc-page",
            header { class: "qc-page__header",
                h1 { {t!("dashboard-title")} }
                p { class: "qc-page__subtitle", {t!("dashboard-subtitle", lab = lab_code)} }
            }

            FilterPanel { signals, on_event }

            div { class: "qc-page__main",
                ChartPanel { signals, image_filename, on_event }
                StatisticsPanel { signals }
            }

            TablePanel { signals, on_event }
        }
    }
}

fn spawn_refresh(controller: Rc<Controller>, cycle: RefreshCycle) {
    let period_ms = controller.config().refresh_period_ms;
    platform::spawn_future(async move {
        refresh::run_cycle(cycle, period_ms, |generation| {
            let controller = controller.clone();
            async move {
                controller
                    .auto_refresh_tick(generation, platform::page_visible())
                    .await;
            }
        })
        .await;
    });
}
