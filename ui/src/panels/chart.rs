//! Control chart panel. Drawing is delegated to Plotly through a handful of
//! `wasm-bindgen` imports; the figure itself is plain JSON built here.

use dioxus::prelude::*;
use serde_json::{json, Value};

use crate::core::controller::DashboardEvent;
use crate::core::surface::{ChartSeries, ChartTitle, ChartView};
use crate::panels::{use_locale, DashboardSignals};
use crate::t;

const CHART_ID: &str = "control-chart";
const LIMIT: f64 = 3.0;
const BLANK_RANGE: [f64; 2] = [-4.0, 4.0];
const IMAGE_WIDTH: u32 = 1200;
const IMAGE_HEIGHT: u32 = 600;

/// Localized strings baked into the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub series: String,
    pub upper_limit: String,
    pub lower_limit: String,
    pub target: String,
}

impl FigureLabels {
    fn localized() -> Self {
        Self {
            title: t!("chart-figure-title"),
            x_axis: t!("chart-axis-time"),
            y_axis: t!("chart-axis-z"),
            series: t!("chart-series"),
            upper_limit: t!("chart-upper-limit"),
            lower_limit: t!("chart-lower-limit"),
            target: t!("chart-target"),
        }
    }
}

#[component]
pub fn ChartPanel(
    signals: DashboardSignals,
    image_filename: String,
    on_event: EventHandler<DashboardEvent>,
) -> Element {
    let loading = signals.loading.read().chart;
    let view = signals.chart.read().clone();
    let heading = chart_heading(&signals.title.read());
    let locale = use_locale();

    use_effect(move || {
        if let Some(lang) = locale {
            let _ = lang.read();
        }
        let view = signals.chart.read().clone();
        if !matches!(view, ChartView::NoData { .. }) {
            let figure = figure(&view, &FigureLabels::localized());
            plotly::react(CHART_ID, &figure);
        }
    });

    let upload = upload_link(&view).map(str::to_string);
    let no_data = upload.is_some();

    rsx! {
        section { class: "qc-card qc-chart",
            div { class: "qc-card__header",
                h2 { "{heading}" }
                div { class: "qc-chart__actions",
                    button {
                        class: "button button--primary",
                        r#type: "button",
                        disabled: loading,
                        onclick: move |_| on_event.call(DashboardEvent::RefreshChart),
                        if loading {
                            span { class: "qc-spinner" }
                            {t!("loading")}
                        } else {
                            {t!("chart-refresh")}
                        }
                    }
                    button {
                        class: "button button--ghost",
                        r#type: "button",
                        disabled: no_data,
                        onclick: move |_| plotly::download_image(CHART_ID, &image_options(&image_filename)),
                        {t!("chart-download")}
                    }
                    button {
                        class: "button button--ghost",
                        r#type: "button",
                        onclick: move |_| plotly::toggle_fullscreen(CHART_ID),
                        {t!("chart-fullscreen")}
                    }
                }
            }

            div {
                id: CHART_ID,
                class: "qc-chart__plot",
                hidden: no_data,
            }

            if let Some(upload_url) = upload {
                div { class: "qc-chart__empty",
                    h3 { {t!("chart-no-data")} }
                    p { {t!("chart-no-data-hint")} }
                    a { class: "button button--primary", href: "{upload_url}", {t!("chart-upload")} }
                }
            }
        }
    }
}

/// Upload call-to-action target when the chart has nothing to plot.
fn upload_link(view: &ChartView) -> Option<&str> {
    match view {
        ChartView::NoData { upload_url } => Some(upload_url.as_str()),
        _ => None,
    }
}

fn chart_heading(title: &ChartTitle) -> String {
    let base = t!("chart-title");
    if title.is_unfiltered() {
        return base;
    }

    let mut parts = Vec::new();
    match &title.single_parameter {
        Some(code) => parts.push(code.clone()),
        None if title.parameters > 0 => {
            parts.push(t!("chart-title-parameters", count = title.parameters))
        }
        None => {}
    }
    if title.techniques > 0 {
        parts.push(t!("chart-title-techniques", count = title.techniques));
    }
    if title.cycles > 0 {
        parts.push(t!("chart-title-cycles", count = title.cycles));
    }

    format!("{base} - {}", parts.join(", "))
}

/// Plotly figure (`data`, `layout`, `config`) for `view`.
pub fn figure(view: &ChartView, labels: &FigureLabels) -> Value {
    let (data, y_range) = match view {
        ChartView::Series(series) if !series.is_empty() => (traces(series, labels), None),
        _ => (Vec::new(), Some(BLANK_RANGE)),
    };

    let mut yaxis = json!({
        "title": labels.y_axis,
        "zeroline": true,
        "zerolinecolor": "rgba(0,0,0,0.3)",
        "gridcolor": "rgba(128,128,128,0.2)",
    });
    if let Some(range) = y_range {
        yaxis["range"] = json!(range);
    }

    json!({
        "data": data,
        "layout": {
            "title": { "text": labels.title, "font": { "size": 16 } },
            "xaxis": { "title": labels.x_axis, "type": "date", "gridcolor": "rgba(128,128,128,0.2)" },
            "yaxis": yaxis,
            "hovermode": "closest",
            "showlegend": true,
            "legend": { "x": 0.02, "y": 0.98, "bgcolor": "rgba(255,255,255,0.8)" },
            "margin": { "t": 60, "r": 40, "b": 60, "l": 60 },
            "plot_bgcolor": "rgba(248,249,250,1)",
            "paper_bgcolor": "white",
        },
        "config": {
            "responsive": true,
            "displayModeBar": true,
            "displaylogo": false,
            "modeBarButtonsToRemove": ["pan2d", "lasso2d", "select2d"],
        },
    })
}

fn traces(series: &ChartSeries, labels: &FigureLabels) -> Vec<Value> {
    let mut traces = vec![json!({
        "x": series.x,
        "y": series.y,
        "text": series.labels,
        "mode": "markers+lines",
        "type": "scatter",
        "name": labels.series,
        "marker": {
            "color": series.colors,
            "size": 8,
            "line": { "color": "rgba(0,0,0,0.3)", "width": 1 },
        },
        "line": { "width": 2, "color": "rgba(31,119,180,0.8)" },
        "hovertemplate": "<b>%{text}</b><br>Z-Score: %{y:.3f}<br>%{x}<extra></extra>",
    })];

    if let Some((first, last)) = series.first_and_last() {
        let line = |y: f64, name: &str, color: &str, width: u32, dash: &str| {
            json!({
                "x": [first, last],
                "y": [y, y],
                "mode": "lines",
                "type": "scatter",
                "name": name,
                "line": { "color": color, "width": width, "dash": dash },
                "hoverinfo": "skip",
            })
        };
        traces.push(line(LIMIT, &labels.upper_limit, "red", 2, "dash"));
        traces.push(line(-LIMIT, &labels.lower_limit, "red", 2, "dash"));
        traces.push(line(0.0, &labels.target, "green", 1, "dot"));
    }
    traces
}

fn image_options(filename: &str) -> Value {
    json!({
        "format": "png",
        "width": IMAGE_WIDTH,
        "height": IMAGE_HEIGHT,
        "filename": filename,
    })
}

#[cfg(target_arch = "wasm32")]
mod plotly {
    use serde_json::Value;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_namespace = Plotly, js_name = react)]
        fn plotly_react(
            id: &str,
            data: &JsValue,
            layout: &JsValue,
            config: &JsValue,
        ) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch, js_namespace = Plotly, js_name = downloadImage)]
        fn plotly_download_image(id: &str, options: &JsValue) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch, js_namespace = ["Plotly", "Plots"], js_name = resize)]
        fn plotly_resize(id: &str) -> Result<JsValue, JsValue>;
    }

    fn to_js(value: &Value) -> Option<JsValue> {
        js_sys::JSON::parse(&value.to_string()).ok()
    }

    pub fn react(id: &str, figure: &Value) {
        let parts = (
            to_js(&figure["data"]),
            to_js(&figure["layout"]),
            to_js(&figure["config"]),
        );
        let (Some(data), Some(layout), Some(config)) = parts else {
            tracing::error!("chart figure could not be converted");
            return;
        };
        if let Err(err) = plotly_react(id, &data, &layout, &config) {
            tracing::error!("Plotly.react failed: {err:?}");
        }
    }

    pub fn download_image(id: &str, options: &Value) {
        let Some(options) = to_js(options) else {
            return;
        };
        if let Err(err) = plotly_download_image(id, &options) {
            tracing::error!("Plotly.downloadImage failed: {err:?}");
        }
    }

    pub fn toggle_fullscreen(id: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
            return;
        }
        let Some(element) = document.get_element_by_id(id) else {
            return;
        };
        if element.request_fullscreen().is_err() {
            tracing::warn!("fullscreen request rejected");
            return;
        }
        let id = id.to_string();
        crate::core::platform::spawn_future(async move {
            crate::core::timing::sleep_ms(100).await;
            if let Err(err) = plotly_resize(&id) {
                tracing::warn!("Plotly.Plots.resize failed: {err:?}");
            }
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod plotly {
    use serde_json::Value;

    pub fn react(id: &str, figure: &Value) {
        let traces = figure["data"].as_array().map_or(0, Vec::len);
        tracing::debug!(id, traces, "chart figure ready");
    }

    pub fn download_image(id: &str, options: &Value) {
        tracing::debug!(id, %options, "chart image download requested");
    }

    pub fn toggle_fullscreen(id: &str) {
        tracing::debug!(id, "fullscreen toggled");
    }
}
