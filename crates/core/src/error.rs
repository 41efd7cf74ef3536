//! Unified error types for seo-mcp.
//!
//! Every failure a tool call can surface is one of these variants. Each maps to a
//! stable code prefix in its message and a JSON-RPC error code on the wire.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::cache::CacheError;
use crate::config::ConfigError;

/// Unified error types for the seo-mcp server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty domain).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Required configuration is missing or invalid.
    #[error("CONFIGURATION_ERROR: {0}")]
    Configuration(String),

    /// The captcha could not be submitted or solved.
    #[error("CAPTCHA_ERROR: {0}")]
    Captcha(String),

    /// The upstream authorization exchange failed or returned an unexpected shape.
    #[error("ACQUISITION_ERROR: {0}")]
    Acquisition(String),

    /// Non-success response from an upstream call that is not downgraded.
    #[error("UPSTREAM_ERROR: {0}")]
    Upstream(String),

    /// Local signature cache could not be read or written.
    #[error("CACHE_ERROR: {0}")]
    Cache(String),

    /// The caller cancelled the request.
    #[error("CANCELLED: {0}")]
    Cancelled(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}

impl From<CacheError> for Error {
    fn from(err: CacheError) -> Self {
        Error::Cache(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Configuration(msg) => (-32020, msg.clone()),
            Error::Captcha(msg) => (-32021, msg.clone()),
            Error::Acquisition(msg) => (-32022, msg.clone()),
            Error::Upstream(msg) => (-32008, msg.clone()),
            Error::Cache(msg) => (-32002, msg.clone()),
            Error::Cancelled(msg) => (-32800, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
