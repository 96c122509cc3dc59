//! Dashboard configuration resolved from the hosting page.

use api::LabRoutes;
use thiserror::Error;

use crate::core::filters::DEFAULT_DAY_WINDOW;
use crate::core::pagination::TABLE_PER_PAGE;
use crate::core::refresh::AUTO_REFRESH_MS;

/// Page size requested by the export link.
pub const EXPORT_PER_PAGE: u32 = 1000;

#[cfg(not(target_arch = "wasm32"))]
const ORIGIN_ENV: &str = "QCBOARD_ORIGIN";
#[cfg(not(target_arch = "wasm32"))]
const LAB_CODE_ENV: &str = "QCBOARD_LAB_CODE";
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_ORIGIN: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the page did not provide a lab code")]
    MissingLabCode,
    #[error("unable to determine the page origin")]
    MissingOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub routes: LabRoutes,
    pub per_page: u32,
    pub default_days: u32,
    pub refresh_period_ms: u64,
    pub export_per_page: u32,
}

impl DashboardConfig {
    pub fn new(routes: LabRoutes) -> Self {
        Self {
            routes,
            per_page: TABLE_PER_PAGE,
            default_days: DEFAULT_DAY_WINDOW,
            refresh_period_ms: AUTO_REFRESH_MS,
            export_per_page: EXPORT_PER_PAGE,
        }
    }

    pub fn lab_code(&self) -> &str {
        self.routes.lab_code()
    }

    /// `window.labCode` and `window.location.origin`.
    #[cfg(target_arch = "wasm32")]
    pub fn from_page_context() -> Result<Self, ConfigError> {
        use crate::core::platform;

        let lab_code = platform::page_lab_code().ok_or(ConfigError::MissingLabCode)?;
        let origin = platform::page_origin().ok_or(ConfigError::MissingOrigin)?;
        Ok(Self::new(LabRoutes::new(origin, lab_code)))
    }

    /// `QCBOARD_LAB_CODE` and `QCBOARD_ORIGIN` (defaults to a local backend).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_page_context() -> Result<Self, ConfigError> {
        let lab_code = std::env::var(LAB_CODE_ENV)
            .ok()
            .filter(|code| !code.trim().is_empty())
            .ok_or(ConfigError::MissingLabCode)?;
        let origin = std::env::var(ORIGIN_ENV).unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
        Ok(Self::new(LabRoutes::new(origin, lab_code)))
    }
}
