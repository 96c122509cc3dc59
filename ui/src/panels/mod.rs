//! Dashboard panels and the signal-backed [`Surface`] that feeds them.

mod chart;
pub use chart::ChartPanel;

mod filters;
pub use filters::FilterPanel;

mod statistics;
pub use statistics::StatisticsPanel;

mod table;
pub use table::TablePanel;

use api::Statistics;
use dioxus::prelude::*;

use crate::core::filters::{FilterOptions, FilterState, FilterSummary};
use crate::core::pagination::PaginationView;
use crate::core::platform;
use crate::core::surface::{ChartTitle, ChartView, Notice, Panel, Surface, TableRowView};
use crate::t;

/// Per-panel loading indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub chart: bool,
    pub table: bool,
    pub statistics: bool,
    pub options: bool,
}

impl LoadingFlags {
    fn set(&mut self, panel: Panel, loading: bool) {
        match panel {
            Panel::Chart => self.chart = loading,
            Panel::Table => self.table = loading,
            Panel::Statistics => self.statistics = loading,
            Panel::Options => self.options = loading,
        }
    }
}

/// Reactive state shared by every panel. All fields are `Copy` signal
/// handles, so the struct is passed around by value.
#[derive(Clone, Copy, PartialEq)]
pub struct DashboardSignals {
    pub loading: Signal<LoadingFlags>,
    pub options: Signal<FilterOptions>,
    pub filters: Signal<FilterState>,
    pub summary: Signal<FilterSummary>,
    pub chart: Signal<ChartView>,
    pub title: Signal<ChartTitle>,
    pub rows: Signal<Vec<TableRowView>>,
    pub total_count: Signal<u64>,
    pub pagination: Signal<PaginationView>,
    pub statistics: Signal<Option<Statistics>>,
}

pub fn use_dashboard_signals() -> DashboardSignals {
    DashboardSignals {
        loading: use_signal(LoadingFlags::default),
        options: use_signal(FilterOptions::default),
        filters: use_signal(FilterState::default),
        summary: use_signal(FilterSummary::default),
        chart: use_signal(ChartView::default),
        title: use_signal(ChartTitle::default),
        rows: use_signal(Vec::new),
        total_count: use_signal(|| 0),
        pagination: use_signal(PaginationView::default),
        statistics: use_signal(|| None),
    }
}

pub struct SignalSurface {
    signals: DashboardSignals,
}

impl SignalSurface {
    pub fn new(signals: DashboardSignals) -> Self {
        Self { signals }
    }
}

impl Surface for SignalSurface {
    fn set_loading(&self, panel: Panel, loading: bool) {
        let mut flags = self.signals.loading;
        flags.with_mut(|flags| flags.set(panel, loading));
    }

    fn render_options(&self, options: &FilterOptions, filters: &FilterState) {
        let mut offered = self.signals.options;
        let mut selected = self.signals.filters;
        offered.set(options.clone());
        selected.set(filters.clone());
    }

    fn render_selection(&self, filters: &FilterState) {
        let mut selected = self.signals.filters;
        selected.set(filters.clone());
    }

    fn render_filter_summary(&self, summary: FilterSummary) {
        let mut signal = self.signals.summary;
        signal.set(summary);
    }

    fn render_series(&self, view: ChartView) {
        let mut chart = self.signals.chart;
        chart.set(view);
    }

    fn render_chart_title(&self, title: ChartTitle) {
        let mut signal = self.signals.title;
        signal.set(title);
    }

    fn render_rows(&self, rows: Vec<TableRowView>, total_count: u64) {
        let mut signal = self.signals.rows;
        let mut total = self.signals.total_count;
        signal.set(rows);
        total.set(total_count);
    }

    fn render_pagination(&self, view: PaginationView) {
        let mut signal = self.signals.pagination;
        signal.set(view);
    }

    fn show_table_empty(&self) {
        let mut rows = self.signals.rows;
        let mut total = self.signals.total_count;
        rows.set(Vec::new());
        total.set(0);
    }

    fn render_statistics(&self, statistics: &Statistics) {
        let mut signal = self.signals.statistics;
        signal.set(Some(statistics.clone()));
    }

    fn notify(&self, notice: Notice) {
        platform::alert(&notice_text(&notice));
    }
}

/// Subscribe the calling component to the platform's language signal so
/// localized labels follow a locale switch.
pub(crate) fn use_locale() -> Option<Signal<String>> {
    let locale = try_use_context::<Signal<String>>();
    if let Some(lang) = locale {
        let _ = lang.read();
    }
    locale
}

/// Localized text of a blocking notice.
pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::ChartFailed(message) => t!("notice-chart-failed", message = message.clone()),
        Notice::ConnectionFailed => t!("notice-connection-failed"),
        Notice::ExportLink { format, url } => {
            t!("notice-export-link", format = format.clone(), url = url.clone())
        }
    }
}
