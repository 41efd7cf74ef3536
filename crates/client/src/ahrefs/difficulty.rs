//! Keyword difficulty report with the organic SERP listing.
//!
//! SERP items look like
//! `{"pos": 1, "content": ["organic", {"link": ["Some", {"title", "url": [kind, {"url"}], "metrics"}]}]}`.
//! Ads, features and empty links are skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::envelope::{EnvelopeError, Tagged, lenient, number_or_zero, zero};
use super::{AhrefsClient, absent_on_error};

const DIFFICULTY_ENDPOINT: &str = "stGetFreeSerpOverviewForKeywordDifficultyChecker";

const ORGANIC_TAG: &str = "organic";
const SOME_TAG: &str = "Some";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDifficulty {
    pub difficulty: Number,
    pub shortage: Number,
    pub last_update: String,
    pub serp: SerpListing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SerpListing {
    pub results: Vec<SerpResult>,
}

/// One organic listing. Metric fields are only present when upstream sent metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerpResult {
    pub title: String,
    pub url: String,
    pub position: Value,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SerpMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerpMetrics {
    #[serde(default)]
    pub domain_rating: Value,
    #[serde(default)]
    pub url_rating: Value,
    #[serde(default)]
    pub traffic: Value,
    #[serde(default)]
    pub keywords: Value,
    #[serde(default)]
    pub top_keyword: Value,
    #[serde(default)]
    pub top_volume: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DifficultyPayload {
    #[serde(default = "zero", deserialize_with = "number_or_zero")]
    difficulty: Number,
    #[serde(default = "zero", deserialize_with = "number_or_zero")]
    shortage: Number,
    #[serde(default, deserialize_with = "lenient")]
    last_update: String,
    #[serde(default, deserialize_with = "lenient")]
    serp: RawSerp,
}

#[derive(Debug, Default, Deserialize)]
struct RawSerp {
    #[serde(default, deserialize_with = "lenient")]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OrganicLink {
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default)]
    url: Value,
    #[serde(default, deserialize_with = "lenient")]
    metrics: Option<SerpMetrics>,
}

#[derive(Debug, Serialize)]
struct DifficultyRequest<'a> {
    captcha: &'a str,
    country: &'a str,
    keyword: &'a str,
}

/// Reduce one raw SERP item to a listing, or `None` if it is not an organic link.
fn organic_result(mut item: Value) -> Option<SerpResult> {
    let mut content = Tagged::leading(item.get_mut("content")?.take()).ok()?;
    if !content.has_tag(ORGANIC_TAG) {
        return None;
    }

    let link = Tagged::leading(content.payload.get_mut("link")?.take()).ok()?;
    if !link.has_tag(SOME_TAG) {
        return None;
    }
    let link: OrganicLink = link.into_payload().ok()?;

    let position = match item.get_mut("pos") {
        Some(pos) => pos.take(),
        None => content.payload.get_mut("pos").map(Value::take).unwrap_or(Value::Null),
    };

    let url = link
        .url
        .get(1)
        .and_then(|u| u.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(SerpResult { title: link.title, url, position, metrics: link.metrics })
}

pub fn extract_difficulty(reply: Value) -> Result<KeywordDifficulty, EnvelopeError> {
    let payload: DifficultyPayload = Tagged::pair(reply)?.into_ok()?;

    let results = payload.serp.results.into_iter().filter_map(organic_result).collect();

    Ok(KeywordDifficulty {
        difficulty: payload.difficulty,
        shortage: payload.shortage,
        last_update: payload.last_update,
        serp: SerpListing { results },
    })
}

impl AhrefsClient {
    /// Difficulty score and organic SERP for `keyword`, or `None` if the reply is unusable.
    pub async fn keyword_difficulty(&self, token: &str, keyword: &str, country: &str) -> Option<KeywordDifficulty> {
        let body = DifficultyRequest { captcha: token, country, keyword };

        let reply = absent_on_error(DIFFICULTY_ENDPOINT, self.post_json(DIFFICULTY_ENDPOINT, &body).await)?;
        let report = absent_on_error(DIFFICULTY_ENDPOINT, extract_difficulty(reply))?;

        tracing::debug!(keyword, country, serp = report.serp.results.len(), "keyword difficulty retrieved");
        Some(report)
    }
}
