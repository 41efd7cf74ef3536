//! Ahrefs free-tools client.
//!
//! Talks to the private `v4` endpoints behind Ahrefs' free SEO checkers and
//! reshapes their replies into flat records.
//!
//! ### Protocol
//!
//! - **Authorization**: keyword and traffic endpoints take a captcha
//!   verification token directly. The backlinks list takes a signed input
//!   (`signature` + `validUntil`) obtained from the backlinks overview
//!   endpoint in exchange for a token; see [`signature`].
//! - **Replies**: `["Ok", payload]` pairs, decoded by [`envelope::Tagged`].
//! - **Failure policy**: the four fetchers never fail. A bad status, an
//!   unexpected shape or a decode error is logged and returned as `None`.
//!   Only signature acquisition reports errors.

pub mod backlinks;
pub mod difficulty;
pub mod envelope;
pub mod error;
pub mod keywords;
pub mod pages;
pub mod signature;
pub mod traffic;

pub use backlinks::Backlink;
pub use difficulty::{KeywordDifficulty, SerpListing, SerpMetrics, SerpResult};
pub use error::{AcquisitionError, UpstreamError};
pub use keywords::{IdeaLabel, KeywordIdea, LabeledIdea};
pub use traffic::{TrafficMode, TrafficOverview, TrafficSummary};

use reqwest::header;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default origin for the API and the checker pages.
const DEFAULT_BASE_URL: &str = "https://ahrefs.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "seo-mcp/0.1";

/// Ahrefs client configuration.
#[derive(Debug, Clone)]
pub struct AhrefsConfig {
    /// Origin (default: https://ahrefs.com).
    pub base_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string (default: seo-mcp/0.1).
    pub user_agent: String,
}

impl Default for AhrefsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Ahrefs free-tools client.
#[derive(Debug, Clone)]
pub struct AhrefsClient {
    http: reqwest::Client,
    config: AhrefsConfig,
}

impl AhrefsClient {
    /// Create a new client with the given configuration.
    pub fn new(mut config: AhrefsConfig) -> Result<Self, UpstreamError> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/v4/{}", self.config.base_url, name)
    }

    /// POST a JSON body to a `v4` endpoint and return the JSON reply.
    async fn post_json<B: Serialize + Sync>(&self, name: &str, body: &B) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .post(self.endpoint(name))
            .header(header::USER_AGENT, &self.config.user_agent)
            .header(header::ACCEPT, "*/*")
            .json(body);

        self.send(name, request).await
    }

    /// GET a `v4` endpoint with query parameters and return the JSON reply.
    async fn get_json<Q: Serialize + Sync>(
        &self, name: &str, query: &Q, referer: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let mut request = self
            .http
            .get(self.endpoint(name))
            .header(header::USER_AGENT, &self.config.user_agent)
            .header(header::ACCEPT, "*/*")
            .header(header::CONTENT_TYPE, "application/json")
            .query(query);

        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }

        self.send(name, request).await
    }

    async fn send(&self, name: &str, request: reqwest::RequestBuilder) -> Result<Value, UpstreamError> {
        let start = Instant::now();
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(endpoint = name, status = status.as_u16(), "ahrefs response in {:?}", start.elapsed());

        if !status.is_success() {
            return Err(UpstreamError::Http { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}

/// Downgrade a fetcher failure to an absent result.
fn absent_on_error<T, E: std::fmt::Display>(endpoint: &str, result: Result<T, E>) -> Option<T> {
    result
        .map_err(|e| tracing::warn!(endpoint, "returning empty result: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_slash() {
        let client =
            AhrefsClient::new(AhrefsConfig { base_url: "http://localhost:1234/".into(), ..Default::default() })
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
        assert_eq!(client.endpoint("stGetFreeKeywordIdeas"), "http://localhost:1234/v4/stGetFreeKeywordIdeas");
    }

    #[test]
    fn test_default_config() {
        let config = AhrefsConfig::default();
        assert_eq!(config.base_url, "https://ahrefs.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
