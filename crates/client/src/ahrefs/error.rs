//! Analytics provider error types.

use std::sync::Arc;

use seo_mcp_core::Error;

/// Transport-level failure of an upstream call.
///
/// Fetchers downgrade these to an absent result; signature acquisition
/// propagates them.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Non-success HTTP status.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Body was not JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { UpstreamError::Timeout } else { UpstreamError::Network(Arc::new(err)) }
    }
}

/// Failure to exchange a verification token for a signed authorization.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    /// The reply was not `["Ok", {signedInput: {signature, input: {validUntil}}, data}]`.
    #[error("unexpected authorization response format: {0}")]
    UnexpectedFormat(String),

    /// The exchange request itself failed.
    #[error("authorization request failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl From<AcquisitionError> for Error {
    fn from(err: AcquisitionError) -> Self {
        match err {
            AcquisitionError::UnexpectedFormat(_) => Error::Acquisition(err.to_string()),
            AcquisitionError::Upstream(_) => Error::Upstream(err.to_string()),
        }
    }
}
