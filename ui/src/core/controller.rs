//! Filter/query state controller.
//!
//! Owns the filter selections, the table page and the latest option lists,
//! derives backend queries from them and pushes results to a [`Surface`].
//! All methods take `&self`: state sits in `Cell`/`RefCell` and no borrow is
//! held across an `.await`, so overlapping fetches on the single UI thread
//! are fine.

use std::cell::{Cell, RefCell};

use api::{ApiError, Endpoint, StatsBackend};
use futures::join;
use time::Date;

use crate::core::config::DashboardConfig;
use crate::core::filters::{Dimension, FilterChange, FilterOptions, FilterState};
use crate::core::pagination::{PaginationState, PaginationView};
use crate::core::refresh::{RefreshCycle, RefreshSchedule};
use crate::core::sequence::Sequencer;
use crate::core::surface::{
    ChartSeries, ChartTitle, ChartView, Notice, Panel, Surface, TableRowView,
};
use crate::core::timing;

/// What happened to one panel fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Empty,
    /// A newer response for the same panel was applied first.
    Stale,
    Failed,
    /// The request was rejected before any fetch.
    Skipped,
}

/// Events produced by the dashboard widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Initialize,
    Toggle { dimension: Dimension, code: String },
    SetDays(Option<u32>),
    SelectAll(Dimension),
    ClearAll(Dimension),
    ResetAll,
    RefreshChart,
    GotoPage(i64),
    Export(ExportFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }
}

/// Keeps a panel's loading indicator on while at least one fetch for it is
/// pending; restored on every exit path.
struct LoadingGuard<'a, S: Surface> {
    surface: &'a S,
    sequencer: &'a Sequencer,
    panel: Panel,
}

impl<'a, S: Surface> LoadingGuard<'a, S> {
    fn enter(surface: &'a S, sequencer: &'a Sequencer, panel: Panel) -> Self {
        if sequencer.enter() == 1 {
            surface.set_loading(panel, true);
        }
        Self {
            surface,
            sequencer,
            panel,
        }
    }
}

impl<S: Surface> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        if self.sequencer.leave() == 0 {
            self.surface.set_loading(self.panel, false);
        }
    }
}

pub struct DashboardController<B, S> {
    backend: B,
    surface: S,
    config: DashboardConfig,
    filters: RefCell<FilterState>,
    options: RefCell<FilterOptions>,
    pagination: Cell<PaginationState>,
    options_loaded: Cell<bool>,
    chart_seq: Sequencer,
    table_seq: Sequencer,
    stats_seq: Sequencer,
    options_seq: Sequencer,
    refresh: RefCell<RefreshSchedule>,
}

impl<B: StatsBackend, S: Surface> DashboardController<B, S> {
    pub fn new(backend: B, surface: S, config: DashboardConfig) -> Self {
        let mut filters = FilterState::default();
        filters.set_days(Some(config.default_days));
        let pagination = PaginationState::new(config.per_page);
        Self {
            backend,
            surface,
            config,
            filters: RefCell::new(filters),
            options: RefCell::new(FilterOptions::default()),
            pagination: Cell::new(pagination),
            options_loaded: Cell::new(false),
            chart_seq: Sequencer::new(),
            table_seq: Sequencer::new(),
            stats_seq: Sequencer::new(),
            options_seq: Sequencer::new(),
            refresh: RefCell::new(RefreshSchedule::new()),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn filters(&self) -> FilterState {
        self.filters.borrow().clone()
    }

    pub fn page(&self) -> u32 {
        self.pagination.get().page()
    }

    pub async fn handle(&self, event: DashboardEvent) {
        tracing::debug!(?event, "dashboard event");
        match event {
            DashboardEvent::Initialize => self.initialize().await,
            DashboardEvent::Toggle { dimension, code } => self.toggle(dimension, &code).await,
            DashboardEvent::SetDays(days) => self.set_filter(FilterChange::Days(days)).await,
            DashboardEvent::SelectAll(dimension) => self.select_all(dimension).await,
            DashboardEvent::ClearAll(dimension) => self.clear_all(dimension).await,
            DashboardEvent::ResetAll => self.reset_all_filters().await,
            DashboardEvent::RefreshChart => {
                self.refresh_chart().await;
            }
            DashboardEvent::GotoPage(page) => {
                self.goto_page(page).await;
            }
            DashboardEvent::Export(format) => self.export_table(format),
        }
    }

    /// First load: option lists (every parameter preselected), then panels.
    pub async fn initialize(&self) {
        self.reset_page();
        self.render_selection();
        self.refresh_options().await;
        self.render_summary();
        self.refresh_panels().await;
    }

    pub async fn set_filter(&self, change: FilterChange) {
        {
            let options = self.options.borrow();
            self.filters.borrow_mut().apply(change, &options);
        }
        self.filters_changed().await;
    }

    pub async fn toggle(&self, dimension: Dimension, code: &str) {
        let mut codes: Vec<String> = self
            .filters
            .borrow()
            .selection(dimension)
            .iter()
            .cloned()
            .collect();
        if let Some(pos) = codes.iter().position(|c| c == code) {
            codes.remove(pos);
        } else {
            codes.push(code.to_string());
        }
        let change = match dimension {
            Dimension::Parameters => FilterChange::Parameters(codes),
            Dimension::Techniques => FilterChange::Techniques(codes),
            Dimension::Cycles => FilterChange::Cycles(codes),
        };
        self.set_filter(change).await;
    }

    pub async fn select_all(&self, dimension: Dimension) {
        {
            let options = self.options.borrow();
            self.filters.borrow_mut().select_all(dimension, &options);
        }
        self.filters_changed().await;
    }

    pub async fn clear_all(&self, dimension: Dimension) {
        self.filters.borrow_mut().clear_all(dimension);
        self.filters_changed().await;
    }

    pub async fn reset_all_filters(&self) {
        {
            let mut filters = self.filters.borrow_mut();
            filters.reset();
            filters.set_days(Some(self.config.default_days));
        }
        self.filters_changed().await;
    }

    async fn filters_changed(&self) {
        self.reset_page();
        self.render_selection();
        self.render_summary();
        self.refresh_options().await;
        self.refresh_panels().await;
    }

    /// Chart, statistics and table side by side, no cascade.
    async fn refresh_panels(&self) {
        join!(
            self.load_chart(),
            self.refresh_statistics(),
            self.refresh_table()
        );
    }

    /// Pages below 1 are ignored without fetching. Only the table reloads.
    pub async fn goto_page(&self, page: i64) -> Outcome {
        let mut pagination = self.pagination.get();
        if !pagination.goto(page) {
            tracing::debug!(page, "ignoring page below 1");
            return Outcome::Skipped;
        }
        self.pagination.set(pagination);
        self.refresh_table().await
    }

    /// Reload the chart; on success statistics and the table (back on page 1)
    /// follow.
    pub async fn refresh_chart(&self) -> Outcome {
        let outcome = self.load_chart().await;
        if matches!(outcome, Outcome::Applied | Outcome::Empty) {
            self.reset_page();
            join!(self.refresh_statistics(), self.refresh_table());
        }
        outcome
    }

    async fn load_chart(&self) -> Outcome {
        let query = self.filters.borrow().query();
        let ticket = self.chart_seq.issue();
        let _loading = LoadingGuard::enter(&self.surface, &self.chart_seq, Panel::Chart);

        let result = self.backend.chart_data(&query).await;
        if !self.chart_seq.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale chart response");
            return Outcome::Stale;
        }

        match result {
            Ok(response) => {
                self.surface
                    .render_chart_title(ChartTitle::from_filters(&response.filters));
                if response.data.is_empty() {
                    self.surface.render_series(ChartView::NoData {
                        upload_url: self.config.routes.upload_url(),
                    });
                    Outcome::Empty
                } else {
                    let series = ChartSeries::from_data(response.data);
                    tracing::debug!(points = series.x.len(), "chart updated");
                    self.surface.render_series(ChartView::Series(series));
                    Outcome::Applied
                }
            }
            Err(err) => {
                tracing::error!("chart refresh failed: {err}");
                self.surface.notify(chart_notice(&err));
                Outcome::Failed
            }
        }
    }

    /// Loads the page currently held in state. The served page never feeds
    /// back into it: a filter change may have reset it while this was pending.
    pub async fn refresh_table(&self) -> Outcome {
        let pagination = self.pagination.get();
        let query = self
            .filters
            .borrow()
            .page_query(pagination.page(), pagination.per_page());
        let ticket = self.table_seq.issue();
        let _loading = LoadingGuard::enter(&self.surface, &self.table_seq, Panel::Table);

        let result = self.backend.table_data(&query).await;
        if !self.table_seq.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale table response");
            return Outcome::Stale;
        }

        match result {
            Ok(page) => {
                let outcome = if page.rows.is_empty() {
                    self.surface.show_table_empty();
                    Outcome::Empty
                } else {
                    let rows = page
                        .rows
                        .iter()
                        .enumerate()
                        .map(|(i, row)| TableRowView::from_row(i, row))
                        .collect();
                    self.surface.render_rows(rows, page.pagination.total_count);
                    Outcome::Applied
                };
                self.surface
                    .render_pagination(PaginationView::from_served(&page.pagination));
                outcome
            }
            Err(err) => {
                tracing::error!("table refresh failed: {err}");
                self.surface.show_table_empty();
                self.surface.render_pagination(PaginationView::default());
                Outcome::Failed
            }
        }
    }

    pub async fn refresh_statistics(&self) -> Outcome {
        let query = self.filters.borrow().query();
        let ticket = self.stats_seq.issue();
        let _loading = LoadingGuard::enter(&self.surface, &self.stats_seq, Panel::Statistics);

        let result = self.backend.statistics(&query).await;
        if !self.stats_seq.accept(ticket) {
            return Outcome::Stale;
        }

        match result {
            Ok(statistics) => {
                tracing::info!(
                    total = statistics.total_results,
                    excellent = statistics.performance.excellent,
                    acceptable = statistics.performance.acceptable,
                    poor = statistics.performance.poor,
                    "statistics updated"
                );
                self.surface.render_statistics(&statistics);
                Outcome::Applied
            }
            Err(err) => {
                tracing::error!("statistics refresh failed: {err}");
                Outcome::Failed
            }
        }
    }

    /// Reload technique/cycle availability for the selected parameters and
    /// drop selections that are no longer offered.
    pub async fn refresh_options(&self) -> Outcome {
        let query = self.filters.borrow().options_query();
        let ticket = self.options_seq.issue();
        let _loading = LoadingGuard::enter(&self.surface, &self.options_seq, Panel::Options);

        let result = self.backend.filter_options(&query).await;
        if !self.options_seq.accept(ticket) {
            return Outcome::Stale;
        }

        match result {
            Ok(payload) => {
                let options = FilterOptions::from(payload);
                {
                    let mut filters = self.filters.borrow_mut();
                    if !self.options_loaded.replace(true) && filters.parameters.is_empty() {
                        filters.select_all(Dimension::Parameters, &options);
                    }
                    if filters.retain_offered(&options) {
                        tracing::debug!("pruned selections no longer offered");
                    }
                }
                *self.options.borrow_mut() = options;
                self.surface
                    .render_options(&self.options.borrow(), &self.filters.borrow());
                self.render_summary();
                Outcome::Applied
            }
            Err(err) => {
                tracing::error!("filter options refresh failed: {err}");
                Outcome::Failed
            }
        }
    }

    /// Builds the export link and shows it; no download happens.
    pub fn export_table(&self, format: ExportFormat) {
        let query = self
            .filters
            .borrow()
            .export_query(format.as_str(), self.config.export_per_page);
        match self.config.routes.url(Endpoint::TableData, &query) {
            Ok(url) => {
                tracing::info!(%url, "export link built");
                self.surface.notify(Notice::ExportLink {
                    format: format.as_str().to_uppercase(),
                    url: url.to_string(),
                });
            }
            Err(err) => tracing::error!("export link failed: {err}"),
        }
    }

    /// `control_chart_{lab}_{YYYY-MM-DD}`
    pub fn chart_image_filename(&self, date: Date) -> String {
        format!(
            "control_chart_{}_{}",
            self.config.lab_code(),
            timing::iso_date(date)
        )
    }

    pub fn start_auto_refresh(&self) -> RefreshCycle {
        self.refresh.borrow_mut().start()
    }

    pub fn visibility_changed(&self, visible: bool) -> Option<RefreshCycle> {
        tracing::debug!(visible, "page visibility changed");
        self.refresh.borrow_mut().on_visibility(visible)
    }

    pub fn stop_auto_refresh(&self) {
        self.refresh.borrow_mut().stop();
    }

    pub fn live_refresh_cycles(&self) -> usize {
        self.refresh.borrow().live_cycles()
    }

    /// One auto-refresh tick from cycle `generation`. Skipped while hidden or
    /// when the cycle has been superseded.
    pub async fn auto_refresh_tick(&self, generation: u64, visible: bool) -> Outcome {
        if !visible || !self.refresh.borrow().is_live(generation) {
            return Outcome::Skipped;
        }
        tracing::debug!(generation, "auto-refresh tick");
        self.refresh_chart().await
    }

    fn reset_page(&self) {
        let mut pagination = self.pagination.get();
        pagination.reset();
        self.pagination.set(pagination);
    }

    /// Widgets follow the controller even if the options fetch then fails.
    fn render_selection(&self) {
        self.surface.render_selection(&self.filters.borrow());
    }

    fn render_summary(&self) {
        let summary = self.filters.borrow().summary();
        self.surface.render_filter_summary(summary);
    }
}

fn chart_notice(err: &ApiError) -> Notice {
    if err.is_transport() {
        Notice::ConnectionFailed
    } else {
        Notice::ChartFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use api::{
        ChartData, ChartResponse, FilterOption, FilterOptionsPayload, LabRoutes, Pagination,
        Query, Statistics, TablePage, TableRow,
    };
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use time::macros::date;

    use super::*;
    use crate::core::filters::FilterSummary;

    #[derive(Debug, Clone)]
    enum ChartReply {
        Points(usize),
        Empty,
        Fail(&'static str),
        Unreachable,
    }

    /// A reqwest error that never touched the network.
    fn transport_error() -> ApiError {
        match reqwest::Client::new().get("not a url").build() {
            Err(err) => ApiError::from(err),
            Ok(_) => panic!("an unparseable url should not build a request"),
        }
    }

    struct FakeBackend {
        calls: RefCell<Vec<(Endpoint, Query)>>,
        chart: RefCell<ChartReply>,
        chart_gate: RefCell<Option<oneshot::Receiver<()>>>,
        options: RefCell<FilterOptionsPayload>,
        options_fails: Cell<bool>,
        options_gate: RefCell<Option<oneshot::Receiver<()>>>,
        table_total: Cell<u64>,
        table_fails: Cell<bool>,
        table_gates: RefCell<HashMap<u32, oneshot::Receiver<()>>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                chart: RefCell::new(ChartReply::Points(3)),
                chart_gate: RefCell::new(None),
                options_fails: Cell::new(false),
                options_gate: RefCell::new(None),
                options: RefCell::new(FilterOptionsPayload {
                    parameters: vec![FilterOption::new("PH", "pH"), FilterOption::new("NO3", "Nitrate")],
                    techniques: vec![
                        FilterOption::new("ICP", "ICP-MS"),
                        FilterOption::new("IC", "Ion chromatography").disabled(),
                    ],
                    cycles: vec![FilterOption::new("C1", "Cycle 1")],
                }),
                table_total: Cell::new(60),
                table_fails: Cell::new(false),
                table_gates: RefCell::new(HashMap::new()),
            }
        }

        fn record(&self, endpoint: Endpoint, query: &Query) {
            self.calls.borrow_mut().push((endpoint, query.clone()));
        }

        fn endpoints(&self) -> Vec<Endpoint> {
            self.calls.borrow().iter().map(|(e, _)| *e).collect()
        }

        fn last_query(&self, endpoint: Endpoint) -> Option<Query> {
            self.calls
                .borrow()
                .iter()
                .rev()
                .find(|(e, _)| *e == endpoint)
                .map(|(_, q)| q.clone())
        }
    }

    fn value<'a>(query: &'a Query, key: &str) -> Option<&'a str> {
        query
            .pairs()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    impl StatsBackend for FakeBackend {
        async fn chart_data(&self, query: &Query) -> Result<ChartResponse, ApiError> {
            self.record(Endpoint::ChartData, query);
            let reply = self.chart.borrow().clone();
            let gate = self.chart_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            match reply {
                ChartReply::Points(n) => Ok(ChartResponse {
                    data: ChartData {
                        x: (0..n).map(|i| format!("2025-01-{:02}", i + 1)).collect(),
                        y: (0..n).map(|i| i as f64).collect(),
                        colors: Vec::new(),
                        parameter_codes: vec![String::from("PH"); n],
                    },
                    filters: api::AppliedFilters::default(),
                }),
                ChartReply::Empty => Ok(ChartResponse::default()),
                ChartReply::Fail(message) => Err(ApiError::Backend(message.to_string())),
                ChartReply::Unreachable => Err(transport_error()),
            }
        }

        async fn filter_options(&self, query: &Query) -> Result<FilterOptionsPayload, ApiError> {
            self.record(Endpoint::FilterOptions, query);
            let gate = self.options_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.options_fails.get() {
                return Err(ApiError::Backend("options unavailable".into()));
            }
            Ok(self.options.borrow().clone())
        }

        async fn table_data(&self, query: &Query) -> Result<TablePage, ApiError> {
            self.record(Endpoint::TableData, query);
            let page: u32 = value(query, "page").and_then(|p| p.parse().ok()).unwrap_or(1);
            let gate = self.table_gates.borrow_mut().remove(&page);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.table_fails.get() {
                return Err(ApiError::Backend("table unavailable".into()));
            }

            let total = self.table_total.get();
            let rows = if total == 0 {
                Vec::new()
            } else {
                (0..2)
                    .map(|i| TableRow {
                        id: Some(i64::from(page) * 100 + i),
                        ..TableRow::default()
                    })
                    .collect()
            };
            Ok(TablePage {
                rows,
                pagination: Pagination {
                    page,
                    per_page: 25,
                    total_count: total,
                    total_pages: total.div_ceil(25) as u32,
                },
            })
        }

        async fn statistics(&self, query: &Query) -> Result<Statistics, ApiError> {
            self.record(Endpoint::Statistics, query);
            Ok(Statistics {
                total_results: 5,
                ..Statistics::default()
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Drawn {
        Loading(Panel, bool),
        Options(usize),
        Selection(FilterState),
        Summary(FilterSummary),
        Series(ChartView),
        Title(ChartTitle),
        Rows(Vec<String>, u64),
        Pagination(PaginationView),
        TableEmpty,
        Statistics(u64),
        Notice(Notice),
    }

    #[derive(Default)]
    struct RecordingSurface {
        drawn: RefCell<Vec<Drawn>>,
    }

    impl RecordingSurface {
        fn push(&self, drawn: Drawn) {
            self.drawn.borrow_mut().push(drawn);
        }

        fn drawn(&self) -> Vec<Drawn> {
            self.drawn.borrow().clone()
        }

        fn notices(&self) -> Vec<Notice> {
            self.drawn()
                .into_iter()
                .filter_map(|d| match d {
                    Drawn::Notice(n) => Some(n),
                    _ => None,
                })
                .collect()
        }

        fn series(&self) -> Vec<ChartView> {
            self.drawn()
                .into_iter()
                .filter_map(|d| match d {
                    Drawn::Series(view) => Some(view),
                    _ => None,
                })
                .collect()
        }

        fn last_rows(&self) -> Option<Vec<String>> {
            self.drawn().into_iter().rev().find_map(|d| match d {
                Drawn::Rows(keys, _) => Some(keys),
                _ => None,
            })
        }

        fn clear(&self) {
            self.drawn.borrow_mut().clear();
        }
    }

    impl Surface for RecordingSurface {
        fn set_loading(&self, panel: Panel, loading: bool) {
            self.push(Drawn::Loading(panel, loading));
        }

        fn render_options(&self, options: &FilterOptions, _filters: &FilterState) {
            self.push(Drawn::Options(options.parameters.len()));
        }

        fn render_selection(&self, filters: &FilterState) {
            self.push(Drawn::Selection(filters.clone()));
        }

        fn render_filter_summary(&self, summary: FilterSummary) {
            self.push(Drawn::Summary(summary));
        }

        fn render_series(&self, view: ChartView) {
            self.push(Drawn::Series(view));
        }

        fn render_chart_title(&self, title: ChartTitle) {
            self.push(Drawn::Title(title));
        }

        fn render_rows(&self, rows: Vec<TableRowView>, total_count: u64) {
            let keys = rows.into_iter().map(|row| row.key).collect();
            self.push(Drawn::Rows(keys, total_count));
        }

        fn render_pagination(&self, view: PaginationView) {
            self.push(Drawn::Pagination(view));
        }

        fn show_table_empty(&self) {
            self.push(Drawn::TableEmpty);
        }

        fn render_statistics(&self, statistics: &Statistics) {
            self.push(Drawn::Statistics(statistics.total_results));
        }

        fn notify(&self, notice: Notice) {
            self.push(Drawn::Notice(notice));
        }
    }

    fn controller() -> DashboardController<FakeBackend, RecordingSurface> {
        let config = DashboardConfig::new(LabRoutes::new("http://lab.test", "LAB1"));
        DashboardController::new(FakeBackend::new(), RecordingSurface::default(), config)
    }

    fn codes(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn initialize_selects_every_parameter_then_loads_panels() {
        let ctl = controller();
        block_on(ctl.initialize());

        assert_eq!(ctl.filters().parameters, codes(&["NO3", "PH"]));
        let endpoints = ctl.backend().endpoints();
        assert_eq!(endpoints[0], Endpoint::FilterOptions);
        for endpoint in [Endpoint::ChartData, Endpoint::Statistics, Endpoint::TableData] {
            assert!(endpoints.contains(&endpoint), "{endpoint:?} not fetched");
        }

        let chart = ctl.backend().last_query(Endpoint::ChartData).unwrap();
        assert_eq!(
            chart.pairs(),
            &[
                ("parameters[]", "NO3".to_string()),
                ("parameters[]", "PH".to_string()),
                ("days", "30".to_string()),
            ]
        );
    }

    #[test]
    fn filter_change_reloads_options_before_panels() {
        let ctl = controller();
        block_on(ctl.initialize());
        block_on(ctl.goto_page(2));
        ctl.backend().calls.borrow_mut().clear();

        block_on(ctl.toggle(Dimension::Techniques, "ICP"));

        let endpoints = ctl.backend().endpoints();
        assert_eq!(endpoints[0], Endpoint::FilterOptions);
        assert_eq!(endpoints.len(), 4);
        let table = ctl.backend().last_query(Endpoint::TableData).unwrap();
        assert_eq!(value(&table, "page"), Some("1"));
        assert_eq!(ctl.filters().techniques, codes(&["ICP"]));
    }

    #[test]
    fn disabled_technique_cannot_be_selected() {
        let ctl = controller();
        block_on(ctl.initialize());
        block_on(ctl.set_filter(FilterChange::Techniques(vec!["IC".into(), "ICP".into()])));
        assert_eq!(ctl.filters().techniques, codes(&["ICP"]));

        block_on(ctl.select_all(Dimension::Techniques));
        assert_eq!(ctl.filters().techniques, codes(&["ICP"]));
    }

    #[test]
    fn options_refresh_prunes_withdrawn_selections() {
        let ctl = controller();
        block_on(ctl.initialize());
        block_on(ctl.toggle(Dimension::Techniques, "ICP"));

        ctl.backend().options.borrow_mut().techniques = vec![FilterOption::new("UV", "UV-Vis")];
        block_on(ctl.toggle(Dimension::Parameters, "NO3"));

        let filters = ctl.filters();
        assert_eq!(filters.parameters, codes(&["PH"]));
        assert!(filters.techniques.is_empty());
        let options = ctl.backend().last_query(Endpoint::FilterOptions).unwrap();
        assert_eq!(options.keys().collect::<Vec<_>>(), vec!["parameters[]"]);
    }

    #[test]
    fn reset_restores_the_default_window() {
        let ctl = controller();
        block_on(ctl.initialize());
        block_on(ctl.set_filter(FilterChange::Days(None)));
        assert_eq!(ctl.filters().days, None);
        let chart = ctl.backend().last_query(Endpoint::ChartData).unwrap();
        assert_eq!(value(&chart, "days"), None);

        block_on(ctl.reset_all_filters());
        let filters = ctl.filters();
        assert_eq!(filters.days, Some(30));
        assert!(filters.parameters.is_empty());
        assert_eq!(ctl.page(), 1);
    }

    #[test]
    fn page_below_one_is_ignored() {
        let ctl = controller();
        assert_eq!(block_on(ctl.goto_page(0)), Outcome::Skipped);
        assert_eq!(block_on(ctl.goto_page(-3)), Outcome::Skipped);
        assert!(ctl.backend().endpoints().is_empty());
    }

    #[test]
    fn goto_page_only_reloads_the_table() {
        let ctl = controller();
        assert_eq!(block_on(ctl.goto_page(2)), Outcome::Applied);
        assert_eq!(ctl.backend().endpoints(), vec![Endpoint::TableData]);
        let table = ctl.backend().last_query(Endpoint::TableData).unwrap();
        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            vec!["days", "page", "per_page"]
        );
        assert_eq!(value(&table, "page"), Some("2"));
        assert_eq!(ctl.surface().last_rows(), Some(vec!["200".into(), "201".into()]));
    }

    #[test]
    fn stale_table_response_is_discarded() {
        let ctl = controller();
        let (release, gate) = oneshot::channel();
        ctl.backend().table_gates.borrow_mut().insert(2, gate);

        let (older, newer, ()) = block_on(async {
            futures::join!(ctl.goto_page(2), ctl.goto_page(3), async {
                let _ = release.send(());
            })
        });

        assert_eq!(newer, Outcome::Applied);
        assert_eq!(older, Outcome::Stale);
        assert_eq!(ctl.surface().last_rows(), Some(vec!["300".into(), "301".into()]));
        assert_eq!(ctl.page(), 3);

        let table_loading: Vec<_> = ctl
            .surface()
            .drawn()
            .into_iter()
            .filter(|d| matches!(d, Drawn::Loading(Panel::Table, _)))
            .collect();
        assert_eq!(
            table_loading,
            vec![
                Drawn::Loading(Panel::Table, true),
                Drawn::Loading(Panel::Table, false)
            ]
        );
    }

    #[test]
    fn filter_change_keeps_page_one_when_an_older_page_lands_late() {
        let ctl = controller();
        block_on(ctl.initialize());
        ctl.backend().calls.borrow_mut().clear();

        let (release_page, page_gate) = oneshot::channel();
        let (release_options, options_gate) = oneshot::channel();
        ctl.backend().table_gates.borrow_mut().insert(3, page_gate);
        *ctl.backend().options_gate.borrow_mut() = Some(options_gate);

        block_on(async {
            futures::join!(
                ctl.goto_page(3),
                ctl.toggle(Dimension::Techniques, "ICP"),
                async {
                    let _ = release_page.send(());
                    let _ = release_options.send(());
                }
            )
        });

        let pages: Vec<_> = ctl
            .backend()
            .calls
            .borrow()
            .iter()
            .filter(|(e, _)| *e == Endpoint::TableData)
            .filter_map(|(_, q)| value(q, "page").map(str::to_string))
            .collect();
        assert_eq!(pages, vec!["3", "1"]);
        assert_eq!(ctl.page(), 1);
        assert_eq!(ctl.surface().last_rows(), Some(vec!["100".into(), "101".into()]));
        assert_eq!(ctl.filters().techniques, codes(&["ICP"]));
    }

    #[test]
    fn selection_is_drawn_even_when_options_fail() {
        let ctl = controller();
        block_on(ctl.initialize());
        block_on(ctl.set_filter(FilterChange::Days(None)));
        ctl.backend().options_fails.set(true);
        ctl.surface().clear();

        block_on(ctl.reset_all_filters());

        let expected = ctl.filters();
        assert_eq!(expected.days, Some(30));
        assert!(expected.parameters.is_empty());
        let drawn = ctl.surface().drawn();
        assert_eq!(
            drawn.iter().find(|d| matches!(d, Drawn::Selection(_))),
            Some(&Drawn::Selection(expected))
        );
        assert!(!drawn.iter().any(|d| matches!(d, Drawn::Options(_))));
        assert!(drawn.contains(&Drawn::Loading(Panel::Options, false)));
    }

    #[test]
    fn stale_chart_response_is_discarded() {
        let ctl = controller();
        let (release, gate) = oneshot::channel();
        *ctl.backend().chart_gate.borrow_mut() = Some(gate);
        *ctl.backend().chart.borrow_mut() = ChartReply::Points(5);

        let (older, (), newer, ()) = block_on(async {
            futures::join!(
                ctl.refresh_chart(),
                async {
                    *ctl.backend().chart.borrow_mut() = ChartReply::Points(2);
                },
                ctl.refresh_chart(),
                async {
                    let _ = release.send(());
                }
            )
        });

        assert_eq!(older, Outcome::Stale);
        assert_eq!(newer, Outcome::Applied);
        let series = ctl.surface().series();
        assert_eq!(series.len(), 1);
        let [ChartView::Series(points)] = series.as_slice() else {
            panic!("expected one drawn series, got {series:?}");
        };
        assert_eq!(points.x.len(), 2);

        let chart_loading: Vec<_> = ctl
            .surface()
            .drawn()
            .into_iter()
            .filter(|d| matches!(d, Drawn::Loading(Panel::Chart, _)))
            .collect();
        assert_eq!(
            chart_loading,
            vec![
                Drawn::Loading(Panel::Chart, true),
                Drawn::Loading(Panel::Chart, false)
            ]
        );
    }

    #[test]
    fn unreachable_backend_raises_the_connection_notice() {
        let ctl = controller();
        *ctl.backend().chart.borrow_mut() = ChartReply::Unreachable;

        assert_eq!(block_on(ctl.refresh_chart()), Outcome::Failed);
        assert_eq!(ctl.surface().notices(), vec![Notice::ConnectionFailed]);
        assert!(ctl.surface().series().is_empty());
        assert_eq!(ctl.backend().endpoints(), vec![Endpoint::ChartData]);
    }

    #[test]
    fn chart_success_cascades_to_page_one() {
        let ctl = controller();
        block_on(ctl.goto_page(3));
        ctl.backend().calls.borrow_mut().clear();

        assert_eq!(block_on(ctl.refresh_chart()), Outcome::Applied);
        let endpoints = ctl.backend().endpoints();
        assert_eq!(endpoints[0], Endpoint::ChartData);
        assert!(endpoints.contains(&Endpoint::Statistics));
        let table = ctl.backend().last_query(Endpoint::TableData).unwrap();
        assert_eq!(value(&table, "page"), Some("1"));
        assert!(ctl.surface().drawn().contains(&Drawn::Statistics(5)));
    }

    #[test]
    fn chart_failure_raises_a_notice_and_stops() {
        let ctl = controller();
        *ctl.backend().chart.borrow_mut() = ChartReply::Fail("no data source");

        assert_eq!(block_on(ctl.refresh_chart()), Outcome::Failed);
        assert_eq!(ctl.backend().endpoints(), vec![Endpoint::ChartData]);
        assert_eq!(
            ctl.surface().notices(),
            vec![Notice::ChartFailed("no data source".into())]
        );
        assert_eq!(
            ctl.surface().drawn().last(),
            Some(&Drawn::Loading(Panel::Chart, false))
        );
    }

    #[test]
    fn empty_chart_offers_the_upload_link() {
        let ctl = controller();
        *ctl.backend().chart.borrow_mut() = ChartReply::Empty;

        assert_eq!(block_on(ctl.refresh_chart()), Outcome::Empty);
        assert!(ctl.surface().drawn().contains(&Drawn::Series(ChartView::NoData {
            upload_url: "http://lab.test/l/LAB1/stats/upload".into()
        })));
    }

    #[test]
    fn table_failure_degrades_to_no_data() {
        let ctl = controller();
        ctl.backend().table_fails.set(true);

        assert_eq!(block_on(ctl.refresh_table()), Outcome::Failed);
        let drawn = ctl.surface().drawn();
        assert!(drawn.contains(&Drawn::TableEmpty));
        assert!(drawn.contains(&Drawn::Pagination(PaginationView::default())));
        assert!(ctl.surface().notices().is_empty());
    }

    #[test]
    fn empty_table_shows_placeholder_without_caption() {
        let ctl = controller();
        ctl.backend().table_total.set(0);

        assert_eq!(block_on(ctl.refresh_table()), Outcome::Empty);
        assert_eq!(
            ctl.surface().drawn(),
            vec![
                Drawn::Loading(Panel::Table, true),
                Drawn::TableEmpty,
                Drawn::Pagination(PaginationView::default()),
                Drawn::Loading(Panel::Table, false),
            ]
        );
    }

    #[test]
    fn export_builds_a_link_without_fetching() {
        let ctl = controller();
        ctl.export_table(ExportFormat::Csv);

        assert!(ctl.backend().endpoints().is_empty());
        let notices = ctl.surface().notices();
        let [Notice::ExportLink { format, url }] = notices.as_slice() else {
            panic!("expected one export notice, got {notices:?}");
        };
        assert_eq!(format, "CSV");
        assert_eq!(
            url,
            "http://lab.test/l/LAB1/stats/api/table-data?days=30&format=csv&per_page=1000"
        );
    }

    #[test]
    fn chart_image_is_named_after_lab_and_date() {
        let ctl = controller();
        assert_eq!(
            ctl.chart_image_filename(date!(2025 - 01 - 09)),
            "control_chart_LAB1_2025-01-09"
        );
    }

    #[test]
    fn auto_refresh_ticks_only_from_the_live_visible_cycle() {
        let ctl = controller();
        let first = ctl.start_auto_refresh();

        assert_eq!(
            block_on(ctl.auto_refresh_tick(first.generation(), false)),
            Outcome::Skipped
        );
        assert!(ctl.visibility_changed(false).is_none());
        assert_eq!(ctl.live_refresh_cycles(), 0);

        let resumed = ctl.visibility_changed(true).unwrap();
        assert_eq!(ctl.live_refresh_cycles(), 1);
        assert_eq!(
            block_on(ctl.auto_refresh_tick(first.generation(), true)),
            Outcome::Skipped
        );
        assert!(ctl.backend().endpoints().is_empty());

        assert_eq!(
            block_on(ctl.auto_refresh_tick(resumed.generation(), true)),
            Outcome::Applied
        );
        assert_eq!(ctl.backend().endpoints()[0], Endpoint::ChartData);
    }

    #[test]
    fn summary_follows_selection_counts() {
        let ctl = controller();
        block_on(ctl.initialize());
        ctl.surface().clear();
        block_on(ctl.clear_all(Dimension::Parameters));

        assert!(ctl.surface().drawn().contains(&Drawn::Summary(FilterSummary::default())));
    }
}
