use thiserror::Error;

/// Failures surfaced by [`crate::StatsBackend`] implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a decodable body (network, CORS, bad JSON).
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Backend(String),

    /// A successful envelope was missing its payload field.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Transport failures are reported with a generic "retry" message; logical
    /// failures carry the backend's own text.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
