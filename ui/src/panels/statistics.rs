use dioxus::prelude::*;

use crate::core::format;
use crate::panels::{use_locale, DashboardSignals};
use crate::t;

#[component]
pub fn StatisticsPanel(signals: DashboardSignals) -> Element {
    use_locale();
    let loading = signals.loading.read().statistics;
    let statistics = signals.statistics.read().clone();

    rsx! {
        section { class: "qc-card qc-stats",
            div { class: "qc-card__header",
                h2 { {t!("stats-title")} }
                if loading {
                    span { class: "qc-spinner", aria_label: t!("loading") }
                }
            }

            {match statistics {
                None => rsx! {
                    p { class: "qc-card__placeholder", {t!("stats-pending")} }
                },
                Some(stats) => {
                    let perf = stats.performance;
                    let z = stats.z_score_stats;
                    rsx! {
                        div { class: "qc-stats__grid",
                            div { class: "qc-stat",
                                span { class: "qc-stat__label", {t!("stats-total")} }
                                strong { class: "qc-stat__value", "{stats.total_results}" }
                            }
                            div { class: "qc-stat qc-stat--excellent",
                                span { class: "qc-stat__label", {t!("stats-excellent")} }
                                strong { class: "qc-stat__value", "{perf.excellent}" }
                                span { class: "qc-stat__meta", "{format::format_percent(perf.excellent_pct)}" }
                            }
                            div { class: "qc-stat qc-stat--acceptable",
                                span { class: "qc-stat__label", {t!("stats-acceptable")} }
                                strong { class: "qc-stat__value", "{perf.acceptable}" }
                                span { class: "qc-stat__meta", "{format::format_percent(perf.acceptable_pct)}" }
                            }
                            div { class: "qc-stat qc-stat--poor",
                                span { class: "qc-stat__label", {t!("stats-poor")} }
                                strong { class: "qc-stat__value", "{perf.poor}" }
                                span { class: "qc-stat__meta", "{format::format_percent(perf.poor_pct)}" }
                            }
                        }
                        dl { class: "qc-stats__z",
                            dt { {t!("stats-z-mean")} }
                            dd { "{format::format_optional(z.mean)}" }
                            dt { {t!("stats-z-sd")} }
                            dd { "{format::format_optional(z.std_dev)}" }
                            dt { {t!("stats-z-min")} }
                            dd { "{format::format_optional(z.min)}" }
                            dt { {t!("stats-z-max")} }
                            dd { "{format::format_optional(z.max)}" }
                        }
                    }
                }
            }}
        }
    }
}
