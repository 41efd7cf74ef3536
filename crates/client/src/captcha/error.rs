//! Captcha solver error types.

use std::sync::Arc;
use std::time::Duration;

use seo_mcp_core::Error;

/// Errors from the captcha solving service.
#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    /// No solver credential configured; nothing was sent.
    #[error("missing API key: CAPSOLVER_API_KEY not set")]
    MissingApiKey,

    /// The solver did not hand back a task id.
    #[error("task submission failed: {0}")]
    SubmissionFailed(String),

    /// The solver reported the task as failed or errored.
    #[error("captcha solve failed: {0}")]
    SolveFailed(String),

    /// The task was still pending when the solve budget ran out.
    #[error("captcha not solved within {0:?}")]
    Timeout(Duration),

    /// A single solver request timed out.
    #[error("solver request timeout")]
    RequestTimeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Solver response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CaptchaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { CaptchaError::RequestTimeout } else { CaptchaError::Network(Arc::new(err)) }
    }
}

impl From<CaptchaError> for Error {
    fn from(err: CaptchaError) -> Self {
        match err {
            CaptchaError::MissingApiKey => Error::Configuration(err.to_string()),
            _ => Error::Captcha(err.to_string()),
        }
    }
}
