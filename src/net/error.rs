//! Error taxonomy for the REST layer.
//!
//! ERROR HANDLING
//! ==============
//! `TransportError` covers requests that never produced a response.
//! `ApiError` adds status and payload failures on top. Neither crosses the
//! session boundary: `state::session` folds them into a definite state.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// A request that did not produce an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("http transport unavailable outside the browser")]
    Unavailable,
    #[error("request could not be built: {0}")]
    Build(String),
    #[error("network failure: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("server rejected request with status {status}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("{0}")]
    Invalid(&'static str),
}

impl ApiError {
    /// Whether the server refused the credential (expired or invalid token).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
