use dioxus::prelude::*;

use crate::core::controller::DashboardEvent;
use crate::core::filters::Dimension;
use crate::panels::{use_locale, DashboardSignals};
use crate::t;

/// Day windows offered by the range selector; `None` is "all time".
const DAY_CHOICES: [Option<u32>; 6] = [Some(7), Some(30), Some(90), Some(180), Some(365), None];

#[component]
pub fn FilterPanel(signals: DashboardSignals, on_event: EventHandler<DashboardEvent>) -> Element {
    use_locale();
    let summary = (signals.summary)();
    let days = signals.filters.read().days;
    let loading = signals.loading.read().options;
    let selected_days = days.map(|d| d.to_string()).unwrap_or_default();

    rsx! {
        section { class: "qc-card qc-filters",
            div { class: "qc-card__header",
                h2 { {t!("filters-title")} }
                if loading {
                    span { class: "qc-spinner", aria_label: t!("loading") }
                }
            }

            div { class: "qc-filters__grid",
                for dimension in Dimension::ALL {
                    FilterList { key: "{dimension:?}", dimension, signals, on_event }
                }

                div { class: "qc-filters__group",
                    label { class: "qc-filters__label", r#for: "days-filter", {t!("filters-days")} }
                    select {
                        id: "days-filter",
                        class: "qc-select",
                        value: "{selected_days}",
                        onchange: move |evt: FormEvent| {
                            on_event.call(DashboardEvent::SetDays(evt.value().parse().ok()));
                        },
                        for choice in DAY_CHOICES {
                            option {
                                value: choice.map(|d| d.to_string()).unwrap_or_default(),
                                selected: choice == days,
                                {day_label(choice)}
                            }
                        }
                    }
                }
            }

            div { class: "qc-filters__footer",
                p { class: "qc-filters__summary",
                    {t!("filters-summary",
                        parameters = summary.parameters,
                        techniques = summary.techniques,
                        cycles = summary.cycles)}
                    " · "
                    {t!("filters-expected", count = summary.expected_results())}
                }
                button {
                    class: "button button--ghost",
                    r#type: "button",
                    onclick: move |_| on_event.call(DashboardEvent::ResetAll),
                    {t!("filters-reset")}
                }
            }
        }
    }
}

#[component]
fn FilterList(
    dimension: Dimension,
    signals: DashboardSignals,
    on_event: EventHandler<DashboardEvent>,
) -> Element {
    use_locale();
    let options = signals.options.read().offered(dimension).to_vec();
    let selected = signals.filters.read().selection(dimension).clone();

    rsx! {
        fieldset { class: "qc-filters__group",
            legend { class: "qc-filters__label", {dimension_label(dimension)} }
            div { class: "qc-filters__bulk",
                button {
                    class: "button button--small",
                    r#type: "button",
                    onclick: move |_| on_event.call(DashboardEvent::SelectAll(dimension)),
                    {t!("filters-select-all")}
                }
                button {
                    class: "button button--small button--ghost",
                    r#type: "button",
                    onclick: move |_| on_event.call(DashboardEvent::ClearAll(dimension)),
                    {t!("filters-clear-all")}
                }
            }
            if options.is_empty() {
                p { class: "qc-filters__empty", {t!("filters-none")} }
            }
            ul { class: "qc-filters__options",
                for option in options {
                    li {
                        key: "{option.code}",
                        class: if option.disabled && dimension.honours_disabled() { "qc-filters__option qc-filters__option--disabled" } else { "qc-filters__option" },
                        label {
                            input {
                                r#type: "checkbox",
                                value: "{option.code}",
                                checked: selected.contains(&option.code),
                                disabled: option.disabled && dimension.honours_disabled(),
                                onchange: {
                                    let code = option.code.clone();
                                    move |_| on_event.call(DashboardEvent::Toggle {
                                        dimension,
                                        code: code.clone(),
                                    })
                                },
                            }
                            span { class: "qc-filters__code", "{option.code}" }
                            span { class: "qc-filters__name", "{option.name}" }
                        }
                    }
                }
            }
        }
    }
}

fn dimension_label(dimension: Dimension) -> String {
    match dimension {
        Dimension::Parameters => t!("filters-parameters"),
        Dimension::Techniques => t!("filters-techniques"),
        Dimension::Cycles => t!("filters-cycles"),
    }
}

fn day_label(days: Option<u32>) -> String {
    match days {
        Some(days) => t!("filters-days-option", days = days),
        None => t!("filters-days-all"),
    }
}
