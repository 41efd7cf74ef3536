//! get_backlinks_list tool implementation.
//!
//! Uses a cached signature for the domain when one is still valid, otherwise
//! solves a captcha and exchanges the token for a fresh one.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use seo_mcp_client::Backlink;

use super::{json_result, required};
use crate::services::Services;

/// Input parameters for get_backlinks_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BacklinksParams {
    /// Domain to query, e.g. "example.com".
    pub domain: String,
}

/// Output structure for get_backlinks_list tool.
#[derive(Debug, Clone, Serialize)]
pub struct BacklinksOutput {
    /// Overview returned when the signature was issued (null if none).
    pub overview: Option<Value>,
    /// Top backlinks; empty when the list could not be retrieved.
    pub backlinks: Vec<Backlink>,
}

/// Implementation of the get_backlinks_list tool.
pub async fn backlinks_impl(services: &Services, params: BacklinksParams) -> Result<CallToolResult, McpError> {
    let domain = required("domain", &params.domain)?;
    let captcha = services.captcha()?;

    let auth = services
        .ahrefs
        .authorize(domain, captcha, services.store.as_ref())
        .await?;

    let backlinks = services.ahrefs.backlinks(&auth).await.unwrap_or_default();
    let output = BacklinksOutput { overview: auth.overview, backlinks };

    Ok(json_result(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;
    use chrono::{Duration, SecondsFormat, Utc};
    use httpmock::prelude::*;
    use seo_mcp_core::{CachedAuthorization, MemorySignatureStore, SignatureStore};
    use serde_json::json;
    use std::sync::Arc;

    fn future_iso() -> String {
        (Utc::now() + Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    async fn mock_backlinks(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v4/stGetFreeBacklinksList");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!(["Ok", {"topBacklinks": {"backlinks": [
                        {"anchor": "a", "domainRating": 50, "urlFrom": "https://a.org/", "urlTo": "https://example.com/"},
                        {"anchor": "b", "urlFrom": "https://b.org/", "urlTo": "https://example.com/x", "gov": true}
                    ]}}]));
            })
            .await
    }

    #[tokio::test]
    async fn test_backlinks_cold_cache() {
        let server = MockServer::start_async().await;
        mock_solver(&server, "T").await;
        let overview_reply = json!(["Ok", {
            "signedInput": {"signature": "sig", "input": {"validUntil": future_iso()}},
            "data": {"backlinks": 2}
        }]);
        let overview = server
            .mock_async(|when, then| {
                when.method(POST).path("/v4/stGetFreeBacklinksOverview");
                then.status(200).header("content-type", "application/json").json_body(overview_reply);
            })
            .await;
        let list = mock_backlinks(&server).await;

        let store = Arc::new(MemorySignatureStore::new());
        let services = services_for(&server, store.clone());

        let result = backlinks_impl(&services, BacklinksParams { domain: "example.com".into() })
            .await
            .unwrap();
        let output = payload(&result);

        assert_eq!(output["overview"], json!({"backlinks": 2}));
        assert_eq!(output["backlinks"].as_array().unwrap().len(), 2);
        assert_eq!(output["backlinks"][1]["domainRating"], json!(0));
        assert_eq!(output["backlinks"][1]["gov"], json!(true));
        assert!(store.get("example.com").await.unwrap().is_some());
        overview.assert_async().await;
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_backlinks_warm_cache_skips_captcha() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/createTask");
                then.status(200);
            })
            .await;
        let list = mock_backlinks(&server).await;

        let store = Arc::new(MemorySignatureStore::new());
        store
            .put(&CachedAuthorization::new("example.com", "cached", future_iso(), None).unwrap())
            .await
            .unwrap();
        let services = services_for(&server, store);

        let result = backlinks_impl(&services, BacklinksParams { domain: "example.com".into() })
            .await
            .unwrap();
        let output = payload(&result);

        assert!(output["overview"].is_null());
        assert_eq!(output["backlinks"].as_array().unwrap().len(), 2);
        create.assert_calls_async(0).await;
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_backlinks_list_failure_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v4/stGetFreeBacklinksList");
                then.status(502);
            })
            .await;

        let store = Arc::new(MemorySignatureStore::new());
        store
            .put(&CachedAuthorization::new("example.com", "cached", future_iso(), None).unwrap())
            .await
            .unwrap();
        let services = services_for(&server, store);

        let result = backlinks_impl(&services, BacklinksParams { domain: "example.com".into() })
            .await
            .unwrap();

        assert_eq!(payload(&result)["backlinks"], json!([]));
    }

    #[tokio::test]
    async fn test_backlinks_acquisition_failure() {
        let server = MockServer::start_async().await;
        mock_solver(&server, "T").await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v4/stGetFreeBacklinksOverview");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"["Ok", {"signedInput": {}}]"#);
            })
            .await;

        let services = services_for(&server, Arc::new(MemorySignatureStore::new()));
        let err = backlinks_impl(&services, BacklinksParams { domain: "example.com".into() })
            .await
            .unwrap_err();

        assert_eq!(err.code.0, -32022);
    }

    #[tokio::test]
    async fn test_backlinks_empty_domain() {
        let server = MockServer::start_async().await;
        let services = services_for(&server, Arc::new(MemorySignatureStore::new()));

        let err = backlinks_impl(&services, BacklinksParams { domain: "  ".into() })
            .await
            .unwrap_err();

        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_backlinks_missing_key() {
        let server = MockServer::start_async().await;
        let services = services_without_key(&server);

        let err = backlinks_impl(&services, BacklinksParams { domain: "example.com".into() })
            .await
            .unwrap_err();

        assert_eq!(err.code.0, -32020);
    }
}
