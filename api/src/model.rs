//! JSON payloads exchanged with the `stats/api/*` endpoints.

use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Raw points for the control chart, ordered by submission time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    #[serde(default)]
    pub x: Vec<String>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub parameter_codes: Vec<String>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Filters echoed back by chart-data, used for the chart title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppliedFilters {
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub cycles: Vec<String>,
    #[serde(default)]
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartResponse {
    pub data: ChartData,
    pub filters: AppliedFilters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOption {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
}

impl FilterOption {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOptionsPayload {
    #[serde(default)]
    pub parameters: Vec<FilterOption>,
    #[serde(default)]
    pub techniques: Vec<FilterOption>,
    #[serde(default)]
    pub cycles: Vec<FilterOption>,
}

/// One results-table row as formatted by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    #[serde(default)]
    pub id: Option<i64>,
    pub submitted_at: String,
    pub parameter_code: String,
    pub parameter_name: String,
    pub technique_code: String,
    pub technique_name: String,
    pub cycle_code: String,
    #[serde(default)]
    pub cycle_name: String,
    pub provider_name: String,
    pub measured_value: f64,
    #[serde(default)]
    pub uncertainty: Option<f64>,
    pub z_score: f64,
    pub performance_class: String,
    pub performance_text: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PerformanceBreakdown {
    #[serde(default)]
    pub excellent: u64,
    #[serde(default)]
    pub acceptable: u64,
    #[serde(default)]
    pub poor: u64,
    #[serde(default)]
    pub excellent_pct: Option<f64>,
    #[serde(default)]
    pub acceptable_pct: Option<f64>,
    #[serde(default)]
    pub poor_pct: Option<f64>,
}

/// Empty (`{}`) when no results matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ZScoreSummary {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub performance: PerformanceBreakdown,
    #[serde(default)]
    pub z_score_stats: ZScoreSummary,
}

// Envelopes. Every endpoint shares `success` / `error`, the payload field differs.

#[derive(Debug, Deserialize)]
pub(crate) struct ChartEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ChartData>,
    #[serde(default)]
    pub filters: Option<AppliedFilters>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub options: Option<FilterOptionsPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<TableRow>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatisticsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub error: Option<String>,
}

fn backend_failure(error: Option<String>) -> ApiError {
    ApiError::Backend(error.unwrap_or_else(|| "unknown backend error".to_string()))
}

impl ChartEnvelope {
    pub(crate) fn into_result(self) -> Result<ChartResponse, ApiError> {
        if !self.success {
            return Err(backend_failure(self.error));
        }
        Ok(ChartResponse {
            data: self.data.ok_or(ApiError::MissingField("data"))?,
            filters: self.filters.unwrap_or_default(),
        })
    }
}

impl OptionsEnvelope {
    pub(crate) fn into_result(self) -> Result<FilterOptionsPayload, ApiError> {
        if !self.success {
            return Err(backend_failure(self.error));
        }
        self.options.ok_or(ApiError::MissingField("options"))
    }
}

impl TableEnvelope {
    pub(crate) fn into_result(self) -> Result<TablePage, ApiError> {
        if !self.success {
            return Err(backend_failure(self.error));
        }
        Ok(TablePage {
            rows: self.data,
            pagination: self.pagination.ok_or(ApiError::MissingField("pagination"))?,
        })
    }
}

impl StatisticsEnvelope {
    pub(crate) fn into_result(self) -> Result<Statistics, ApiError> {
        if !self.success {
            return Err(backend_failure(self.error));
        }
        self.statistics.ok_or(ApiError::MissingField("statistics"))
    }
}
