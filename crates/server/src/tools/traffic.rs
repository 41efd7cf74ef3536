//! get_traffic tool implementation.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use seo_mcp_client::TrafficMode;
use seo_mcp_core::Error;

use super::{json_result, required};
use crate::services::Services;

/// Input parameters for get_traffic tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrafficParams {
    /// Domain or full URL to estimate traffic for.
    pub domain_or_url: String,

    /// Country code, or "None" for worldwide (default "None").
    #[serde(default = "default_country")]
    pub country: String,

    /// "subdomains" (default) or "exact".
    #[serde(default)]
    pub mode: TrafficMode,
}

fn default_country() -> String {
    "None".into()
}

/// Implementation of the get_traffic tool. Renders `null` when no overview
/// could be retrieved. An unknown `mode` is rejected as invalid params
/// while the arguments are decoded.
pub async fn traffic_impl(services: &Services, params: TrafficParams) -> Result<CallToolResult, McpError> {
    let target = required("domain_or_url", &params.domain_or_url)?;
    let mode = params.mode;
    let captcha = services.captcha()?;

    let page = services.ahrefs.traffic_checker_page(target, mode);
    let token = captcha.solve(&page).await.map_err(Error::from)?;

    let overview = services
        .ahrefs
        .traffic(&token, target, &params.country, mode)
        .await;

    Ok(json_result(&overview))
}
