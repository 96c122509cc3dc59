use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::model::{ChartEnvelope, OptionsEnvelope, StatisticsEnvelope, TableEnvelope};
use crate::{
    ApiError, ChartResponse, Endpoint, FilterOptionsPayload, LabRoutes, Query, Statistics,
    TablePage,
};

/// The four read-only endpoints the dashboard consumes.
///
/// Implementations resolve `success: false` envelopes into
/// [`ApiError::Backend`], so callers only ever see typed payloads.
#[allow(async_fn_in_trait)]
pub trait StatsBackend {
    async fn chart_data(&self, query: &Query) -> Result<ChartResponse, ApiError>;
    async fn filter_options(&self, query: &Query) -> Result<FilterOptionsPayload, ApiError>;
    async fn table_data(&self, query: &Query) -> Result<TablePage, ApiError>;
    async fn statistics(&self, query: &Query) -> Result<Statistics, ApiError>;
}

/// HTTP client bound to a single lab.
#[derive(Debug, Clone)]
pub struct LabClient {
    http: Client,
    routes: LabRoutes,
}

impl LabClient {
    pub fn new(routes: LabRoutes) -> Self {
        Self {
            http: Client::new(),
            routes,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &Query,
    ) -> Result<T, ApiError> {
        let url = self.routes.url(endpoint, query)?;
        tracing::debug!(%url, "GET {}", endpoint.path());

        // Failures come back as HTTP 500 with a JSON envelope, so the status is
        // not checked: the body decides.
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.json::<T>().await.map_err(|err| {
            tracing::warn!(%status, "undecodable {} response: {err}", endpoint.path());
            ApiError::from(err)
        })?;
        Ok(body)
    }
}

impl StatsBackend for LabClient {
    async fn chart_data(&self, query: &Query) -> Result<ChartResponse, ApiError> {
        self.get::<ChartEnvelope>(Endpoint::ChartData, query)
            .await?
            .into_result()
    }

    async fn filter_options(&self, query: &Query) -> Result<FilterOptionsPayload, ApiError> {
        self.get::<OptionsEnvelope>(Endpoint::FilterOptions, query)
            .await?
            .into_result()
    }

    async fn table_data(&self, query: &Query) -> Result<TablePage, ApiError> {
        self.get::<TableEnvelope>(Endpoint::TableData, query)
            .await?
            .into_result()
    }

    async fn statistics(&self, query: &Query) -> Result<Statistics, ApiError> {
        self.get::<StatisticsEnvelope>(Endpoint::Statistics, query)
            .await?
            .into_result()
    }
}
