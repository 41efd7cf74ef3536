//! keyword_generator tool implementation.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use seo_mcp_core::Error;

use super::{json_result, required};
use crate::services::Services;

/// Input parameters for keyword_generator tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordGeneratorParams {
    /// Seed keyword.
    pub keyword: String,

    /// Country code (default "us").
    #[serde(default = "default_country")]
    pub country: String,

    /// Search engine (default "Google").
    #[serde(default = "default_search_engine")]
    pub search_engine: String,
}

fn default_country() -> String {
    "us".into()
}

fn default_search_engine() -> String {
    "Google".into()
}

/// Implementation of the keyword_generator tool.
///
/// Returns keyword ideas followed by question ideas; an empty array when
/// nothing could be retrieved.
pub async fn keyword_generator_impl(
    services: &Services, params: KeywordGeneratorParams,
) -> Result<CallToolResult, McpError> {
    let keyword = required("keyword", &params.keyword)?;
    let captcha = services.captcha()?;

    let page = services.ahrefs.keyword_generator_page(keyword, &params.country);
    let token = captcha.solve(&page).await.map_err(Error::from)?;

    let ideas = services
        .ahrefs
        .keyword_ideas(&token, keyword, &params.country, &params.search_engine)
        .await
        .unwrap_or_default();

    Ok(json_result(&ideas))
}
