//! Backend plumbing for the QC dashboard: wire payloads, lab-scoped routes,
//! the ordered query builder and the HTTP client.

pub mod client;
pub mod error;
pub mod model;
pub mod query;
pub mod routes;

pub use client::{LabClient, StatsBackend};
pub use error::ApiError;
pub use model::{
    AppliedFilters, ChartData, ChartResponse, FilterOption, FilterOptionsPayload, Pagination,
    PerformanceBreakdown, Statistics, TablePage, TableRow, ZScoreSummary,
};
pub use query::Query;
pub use routes::{Endpoint, LabRoutes};
