//! Lab-scoped endpoint paths (`/l/{lab}/stats/...`).

use reqwest::Url;

use crate::{ApiError, Query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ChartData,
    FilterOptions,
    TableData,
    Statistics,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::ChartData => "chart-data",
            Self::FilterOptions => "filter-options",
            Self::TableData => "table-data",
            Self::Statistics => "statistics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabRoutes {
    origin: String,
    lab_code: String,
}

impl LabRoutes {
    pub fn new(origin: impl Into<String>, lab_code: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            lab_code: lab_code.into(),
        }
    }

    pub fn lab_code(&self) -> &str {
        &self.lab_code
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn stats_root(&self) -> String {
        format!("{}/l/{}/stats", self.origin, self.lab_code)
    }

    /// Absolute endpoint URL with the query pairs encoded in order.
    pub fn url(&self, endpoint: Endpoint, query: &Query) -> Result<Url, ApiError> {
        let raw = format!("{}/api/{}", self.stats_root(), endpoint.path());
        let mut url = Url::parse(&raw).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.pairs().iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Target of the "upload results" call-to-action shown on an empty chart.
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.stats_root())
    }
}
