//! MCP tool implementations.
//!
//! One module per tool. Each `*_impl` validates its input, solves the
//! captcha for its checker page (backlinks goes through the signature cache
//! instead), calls one fetcher and renders the result as pretty JSON text.
//! An absent fetcher result is a successful call with an empty payload.

pub mod backlinks;
pub mod keyword_difficulty;
pub mod keyword_generator;
pub mod traffic;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use seo_mcp_core::Error;

/// Render a tool payload as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(output).unwrap_or_default())])
}

/// Trimmed value of a required text argument.
pub(crate) fn required<'a>(name: &str, value: &'a str) -> Result<&'a str, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{name} cannot be empty")));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Services wired to a local mock of both upstreams.

    use std::sync::Arc;
    use std::time::Duration;

    use httpmock::prelude::*;
    use rmcp::model::CallToolResult;
    use seo_mcp_client::{AhrefsClient, AhrefsConfig, CaptchaClient, CaptchaConfig};
    use seo_mcp_core::MemorySignatureStore;
    use serde_json::Value;

    use crate::services::Services;

    /// Services talking to `server` for both the solver and the provider.
    pub(crate) fn services_for(server: &MockServer, store: Arc<MemorySignatureStore>) -> Services {
        let ahrefs = AhrefsClient::new(AhrefsConfig { base_url: server.base_url(), ..Default::default() }).unwrap();
        let captcha = CaptchaClient::new(CaptchaConfig {
            api_key: "CAP-test".into(),
            base_url: server.base_url(),
            poll_interval: Duration::from_millis(1),
            max_wait: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();
        Services::new(ahrefs, Some(captcha), store)
    }

    /// Services with no solver key configured.
    pub(crate) fn services_without_key(server: &MockServer) -> Services {
        let ahrefs = AhrefsClient::new(AhrefsConfig { base_url: server.base_url(), ..Default::default() }).unwrap();
        Services::new(ahrefs, None, Arc::new(MemorySignatureStore::new()))
    }

    /// Mock a solver that hands out `token` on the first poll.
    pub(crate) async fn mock_solver(server: &MockServer, token: &str) {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/createTask");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"errorId": 0, "taskId": "task-1"}"#);
            })
            .await;
        let ready = format!(r#"{{"errorId": 0, "status": "ready", "solution": {{"token": "{token}"}}}}"#);
        server
            .mock_async(|when, then| {
                when.method(POST).path("/getTaskResult");
                then.status(200).header("content-type", "application/json").body(ready);
            })
            .await;
    }

    /// Parse the JSON text content of a tool result.
    pub(crate) fn payload(result: &CallToolResult) -> Value {
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}
