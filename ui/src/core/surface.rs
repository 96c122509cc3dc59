//! The rendering seam between the controller and whatever draws the page.

use api::{AppliedFilters, ChartData, Statistics, TableRow};

use crate::core::filters::{FilterOptions, FilterState, FilterSummary};
use crate::core::format;
use crate::core::pagination::PaginationView;
use crate::core::qc::Performance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Chart,
    Table,
    Statistics,
    Options,
}

/// Blocking notices raised by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Chart refresh failed with a backend-reported message.
    ChartFailed(String),
    /// Chart refresh could not reach the backend.
    ConnectionFailed,
    /// The export link built for the current filters.
    ExportLink { format: String, url: String },
}

/// Control-chart points projected from a chart-data response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub colors: Vec<String>,
    pub labels: Vec<String>,
}

impl ChartSeries {
    /// Points are zipped on `x`/`y`. Missing colours are derived from the
    /// z-score band and missing labels left blank.
    pub fn from_data(data: ChartData) -> Self {
        let ChartData {
            mut x,
            mut y,
            colors,
            parameter_codes,
        } = data;
        let len = x.len().min(y.len());
        x.truncate(len);
        y.truncate(len);

        let colors = (0..len)
            .map(|i| {
                colors
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| Performance::from_z(y[i]).chart_color().to_string())
            })
            .collect();
        let labels = (0..len)
            .map(|i| parameter_codes.get(i).cloned().unwrap_or_default())
            .collect();

        Self {
            x,
            y,
            colors,
            labels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn first_and_last(&self) -> Option<(&str, &str)> {
        Some((self.x.first()?.as_str(), self.x.last()?.as_str()))
    }
}

/// What the chart area shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChartView {
    /// Empty axes before the first response.
    #[default]
    Blank,
    Series(ChartSeries),
    /// Successful but empty: placeholder with the upload call-to-action.
    NoData { upload_url: String },
}

/// Chart header summary of the filters the backend applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartTitle {
    /// The code when exactly one parameter is applied.
    pub single_parameter: Option<String>,
    pub parameters: usize,
    pub techniques: usize,
    pub cycles: usize,
}

impl ChartTitle {
    pub fn from_filters(filters: &AppliedFilters) -> Self {
        let single_parameter = match filters.parameters.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };
        Self {
            single_parameter,
            parameters: filters.parameters.len(),
            techniques: filters.techniques.len(),
            cycles: filters.cycles.len(),
        }
    }

    /// No parameter, technique or cycle was applied.
    pub fn is_unfiltered(&self) -> bool {
        self.parameters == 0 && self.techniques == 0 && self.cycles == 0
    }
}

/// Display-ready results-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowView {
    pub key: String,
    pub submitted_at: String,
    pub parameter_code: String,
    pub parameter_name: String,
    pub technique_code: String,
    pub technique_name: String,
    pub cycle_code: String,
    pub provider_name: String,
    pub measured: String,
    pub uncertainty: Option<String>,
    pub z_score: String,
    pub performance: Performance,
    pub performance_text: String,
    pub notes: String,
}

impl TableRowView {
    pub fn from_row(index: usize, row: &TableRow) -> Self {
        let key = row
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("row-{index}"));
        Self {
            key,
            submitted_at: row.submitted_at.clone(),
            parameter_code: row.parameter_code.clone(),
            parameter_name: row.parameter_name.clone(),
            technique_code: row.technique_code.clone(),
            technique_name: row.technique_name.clone(),
            cycle_code: row.cycle_code.clone(),
            provider_name: row.provider_name.clone(),
            measured: format::format_measure(row.measured_value),
            uncertainty: format::format_uncertainty(row.uncertainty),
            z_score: format::format_z(row.z_score),
            performance: Performance::from_class(&row.performance_class, row.z_score),
            performance_text: row.performance_text.clone(),
            notes: row.notes.clone(),
        }
    }
}

/// Everything the controller draws goes through here.
pub trait Surface {
    fn set_loading(&self, panel: Panel, loading: bool);
    fn render_options(&self, options: &FilterOptions, filters: &FilterState);
    /// Current selections and day window, drawn before any fetch.
    fn render_selection(&self, filters: &FilterState);
    fn render_filter_summary(&self, summary: FilterSummary);
    fn render_series(&self, view: ChartView);
    fn render_chart_title(&self, title: ChartTitle);
    fn render_rows(&self, rows: Vec<TableRowView>, total_count: u64);
    fn render_pagination(&self, view: PaginationView);
    /// Table no-data region; also zeroes the result-count badge.
    fn show_table_empty(&self);
    fn render_statistics(&self, statistics: &Statistics);
    fn notify(&self, notice: Notice);
}
