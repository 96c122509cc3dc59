use dioxus::prelude::*;

use crate::core::controller::{DashboardEvent, ExportFormat};
use crate::core::pagination::{PageSlot, PaginationView, StepControl};
use crate::core::surface::TableRowView;
use crate::panels::{use_locale, DashboardSignals};
use crate::t;

#[component]
pub fn TablePanel(signals: DashboardSignals, on_event: EventHandler<DashboardEvent>) -> Element {
    use_locale();
    let loading = signals.loading.read().table;
    let rows = signals.rows.read().clone();
    let total = (signals.total_count)();
    let pagination = signals.pagination.read().clone();

    rsx! {
        section { class: "qc-card qc-table",
            div { class: "qc-card__header",
                h2 {
                    {t!("table-title")}
                    span { class: "qc-badge qc-badge--count", "{total}" }
                }
                div { class: "qc-table__actions",
                    button {
                        class: "button button--small",
                        r#type: "button",
                        onclick: move |_| on_event.call(DashboardEvent::Export(ExportFormat::Csv)),
                        {t!("table-export-csv")}
                    }
                    button {
                        class: "button button--small",
                        r#type: "button",
                        onclick: move |_| on_event.call(DashboardEvent::Export(ExportFormat::Excel)),
                        {t!("table-export-excel")}
                    }
                }
            }

            if loading {
                div { class: "qc-table__loading",
                    span { class: "qc-spinner" }
                    {t!("loading")}
                }
            } else if rows.is_empty() {
                div { class: "qc-table__empty",
                    p { {t!("table-empty")} }
                }
            } else {
                div { class: "qc-table__scroll",
                    table { class: "qc-table__grid",
                        thead {
                            tr {
                                th { {t!("table-col-date")} }
                                th { {t!("table-col-parameter")} }
                                th { {t!("table-col-technique")} }
                                th { {t!("table-col-cycle")} }
                                th { {t!("table-col-value")} }
                                th { {t!("table-col-z")} }
                                th { {t!("table-col-notes")} }
                            }
                        }
                        tbody {
                            for row in rows {
                                ResultRow { key: "{row.key}", row: row.clone() }
                            }
                        }
                    }
                }
            }

            PaginationStrip { view: pagination, on_event }
        }
    }
}

#[component]
fn ResultRow(row: TableRowView) -> Element {
    let badge = format!("qc-badge {}", row.performance.css_modifier());

    rsx! {
        tr {
            td { class: "qc-table__date", "{row.submitted_at}" }
            td {
                strong { "{row.parameter_code}" }
                small { class: "qc-table__muted", "{row.parameter_name}" }
            }
            td {
                span { "{row.technique_code}" }
                small { class: "qc-table__muted", "{row.technique_name}" }
            }
            td {
                span { "{row.cycle_code}" }
                small { class: "qc-table__muted", "{row.provider_name}" }
            }
            td { class: "qc-table__value",
                "{row.measured}"
                if let Some(uncertainty) = row.uncertainty.as_ref() {
                    small { class: "qc-table__muted", " {uncertainty}" }
                }
            }
            td {
                span { class: "{badge}", title: "{row.performance_text}", "{row.z_score}" }
            }
            td { class: "qc-table__notes", "{row.notes}" }
        }
    }
}

#[component]
fn PaginationStrip(view: PaginationView, on_event: EventHandler<DashboardEvent>) -> Element {
    use_locale();
    let caption = view
        .caption
        .map(|c| t!("table-range", start = c.start, end = c.end, total = c.total));

    rsx! {
        div { class: "qc-pagination",
            if let Some(caption) = caption {
                span { class: "qc-pagination__caption", "{caption}" }
            }
            if !view.slots.is_empty() {
                nav { class: "qc-pagination__pages", aria_label: t!("table-pages"),
                    if let Some(step) = view.previous {
                        StepButton { step, label: t!("table-previous"), on_event }
                    }
                    for (index, slot) in view.slots.iter().copied().enumerate() {
                        {match slot {
                            PageSlot::Number { page, active } => rsx! {
                                button {
                                    key: "page-{page}",
                                    class: if active { "qc-pagination__page qc-pagination__page--active" } else { "qc-pagination__page" },
                                    r#type: "button",
                                    aria_current: if active { "page" } else { "false" },
                                    onclick: move |_| on_event.call(DashboardEvent::GotoPage(i64::from(page))),
                                    "{page}"
                                }
                            },
                            PageSlot::Ellipsis => rsx! {
                                span { key: "gap-{index}", class: "qc-pagination__gap", "…" }
                            },
                        }}
                    }
                    if let Some(step) = view.next {
                        StepButton { step, label: t!("table-next"), on_event }
                    }
                }
            }
        }
    }
}

#[component]
fn StepButton(step: StepControl, label: String, on_event: EventHandler<DashboardEvent>) -> Element {
    rsx! {
        button {
            class: "qc-pagination__step",
            r#type: "button",
            disabled: step.disabled,
            onclick: move |_| {
                if !step.disabled {
                    on_event.call(DashboardEvent::GotoPage(step.target));
                }
            },
            "{label}"
        }
    }
}
