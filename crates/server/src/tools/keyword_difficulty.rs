//! keyword_difficulty tool implementation.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use seo_mcp_core::Error;

use super::{json_result, required};
use crate::services::Services;

/// Input parameters for keyword_difficulty tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordDifficultyParams {
    /// Keyword to score.
    pub keyword: String,

    /// Country code (default "us").
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "us".into()
}

/// Implementation of the keyword_difficulty tool. Renders `null` when no
/// report could be retrieved.
pub async fn keyword_difficulty_impl(
    services: &Services, params: KeywordDifficultyParams,
) -> Result<CallToolResult, McpError> {
    let keyword = required("keyword", &params.keyword)?;
    let captcha = services.captcha()?;

    let page = services.ahrefs.keyword_difficulty_page(keyword, &params.country);
    let token = captcha.solve(&page).await.map_err(Error::from)?;

    let report = services
        .ahrefs
        .keyword_difficulty(&token, keyword, &params.country)
        .await;

    Ok(json_result(&report))
}
