//! Traffic overview for a domain or URL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use super::envelope::{EnvelopeError, Tagged, empty_list, lenient, list_or_empty, number_or_zero, zero};
use super::{AhrefsClient, absent_on_error};

const TRAFFIC_ENDPOINT: &str = "stGetFreeTrafficOverview";

/// Whether to aggregate over subdomains or look at the exact URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrafficMode {
    #[default]
    Subdomains,
    Exact,
}

impl TrafficMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TrafficMode::Subdomains => "subdomains",
            TrafficMode::Exact => "exact",
        }
    }
}

impl fmt::Display for TrafficMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monthly averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    #[serde(rename = "trafficMonthlyAvg", default = "zero", deserialize_with = "number_or_zero")]
    pub traffic_monthly_avg: Number,
    /// Field name is misspelled upstream; kept as-is.
    #[serde(rename = "costMontlyAvg", default = "zero", deserialize_with = "number_or_zero")]
    pub cost_monthly_avg: Number,
}

impl Default for TrafficSummary {
    fn default() -> Self {
        Self { traffic_monthly_avg: zero(), cost_monthly_avg: zero() }
    }
}

/// Flattened traffic report. List fields are passed through untouched,
/// whatever shape upstream sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficOverview {
    #[serde(default = "empty_list", deserialize_with = "list_or_empty")]
    pub traffic_history: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub traffic: TrafficSummary,
    #[serde(default = "empty_list", deserialize_with = "list_or_empty")]
    pub top_pages: Value,
    #[serde(default = "empty_list", deserialize_with = "list_or_empty")]
    pub top_countries: Value,
    #[serde(default = "empty_list", deserialize_with = "list_or_empty")]
    pub top_keywords: Value,
}

impl Default for TrafficOverview {
    fn default() -> Self {
        Self {
            traffic_history: empty_list(),
            traffic: TrafficSummary::default(),
            top_pages: empty_list(),
            top_countries: empty_list(),
            top_keywords: empty_list(),
        }
    }
}

/// JSON carried in the `input` query parameter.
#[derive(Debug, Serialize)]
struct TrafficInput<'a> {
    captcha: &'a str,
    country: &'a str,
    protocol: &'a str,
    mode: TrafficMode,
    url: &'a str,
}

pub fn extract_traffic(reply: Value) -> Result<TrafficOverview, EnvelopeError> {
    Tagged::leading(reply)?.into_ok()
}

impl AhrefsClient {
    /// Traffic overview for `target`, or `None` if the reply is unusable.
    pub async fn traffic(
        &self, token: &str, target: &str, country: &str, mode: TrafficMode,
    ) -> Option<TrafficOverview> {
        let input = TrafficInput { captcha: token, country, protocol: "None", mode, url: target };
        let input = absent_on_error(TRAFFIC_ENDPOINT, serde_json::to_string(&input))?;
        let referer = self.traffic_checker_page(target, mode);

        let reply = absent_on_error(
            TRAFFIC_ENDPOINT,
            self.get_json(TRAFFIC_ENDPOINT, &[("input", input)], Some(&referer)).await,
        )?;
        let overview = absent_on_error(TRAFFIC_ENDPOINT, extract_traffic(reply))?;

        tracing::debug!(url = target, monthly = %overview.traffic.traffic_monthly_avg, "traffic overview");
        Some(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ahrefs::AhrefsConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::from_value::<TrafficMode>(json!("exact")).unwrap(), TrafficMode::Exact);
        assert!(serde_json::from_value::<TrafficMode>(json!("prefix")).is_err());
        assert_eq!(serde_json::to_string(&TrafficMode::Exact).unwrap(), "\"exact\"");
        assert_eq!(TrafficMode::default().to_string(), "subdomains");
    }

    #[test]
    fn test_extract_full() {
        let reply = json!(["Ok", {
            "traffic_history": [{"date": "2025-03-01", "organic": 1200}],
            "traffic": {"trafficMonthlyAvg": 1500, "costMontlyAvg": 320.5},
            "top_pages": [{"url": "https://example.com/", "traffic": 900}],
            "top_countries": [{"country": "us", "share": 0.6}],
            "top_keywords": [{"keyword": "example", "position": 1}],
            "ignored": true
        }]);

        let overview = extract_traffic(reply).unwrap();
        assert_eq!(overview.traffic.traffic_monthly_avg, Number::from(1500));
        assert_eq!(overview.traffic.cost_monthly_avg.as_f64(), Some(320.5));
        assert_eq!(overview.top_pages.as_array().map(Vec::len), Some(1));

        let rendered = serde_json::to_value(&overview).unwrap();
        assert_eq!(rendered["traffic"]["costMontlyAvg"], json!(320.5));
        assert!(rendered.get("ignored").is_none());
    }

    #[test]
    fn test_extract_defaults() {
        let overview = extract_traffic(json!(["Ok", {}])).unwrap();
        assert_eq!(overview, TrafficOverview::default());
        assert_eq!(overview.traffic.traffic_monthly_avg, Number::from(0));

        let nulls = extract_traffic(json!(["Ok", {"traffic": null, "top_pages": null}])).unwrap();
        assert_eq!(nulls.top_pages, json!([]));
    }

    #[test]
    fn test_off_type_fields_keep_the_rest() {
        let reply = json!(["Ok", {
            "traffic": {"trafficMonthlyAvg": 1500, "costMontlyAvg": "n/a"},
            "top_pages": [{"url": "https://example.com/"}],
            "top_countries": {"us": 0.6}
        }]);

        let overview = extract_traffic(reply).unwrap();

        assert_eq!(overview.traffic.traffic_monthly_avg, Number::from(1500));
        assert_eq!(overview.traffic.cost_monthly_avg, Number::from(0));
        assert_eq!(overview.top_countries, json!({"us": 0.6}));
        assert_eq!(overview.top_pages, json!([{"url": "https://example.com/"}]));
        assert_eq!(overview.top_keywords, json!([]));

        let summary_off = extract_traffic(json!(["Ok", {"traffic": "hidden", "top_pages": []}])).unwrap();
        assert_eq!(summary_off.traffic, TrafficSummary::default());
    }

    #[test]
    fn test_extract_requires_ok() {
        assert!(extract_traffic(json!(["Error", {}])).is_err());
        assert!(extract_traffic(json!(["Ok"])).is_err());
        assert!(extract_traffic(json!({"traffic": {}})).is_err());
    }

    #[tokio::test]
    async fn test_traffic_over_http() {
        let server = MockServer::start_async().await;
        let client = AhrefsClient::new(AhrefsConfig { base_url: server.base_url(), ..Default::default() }).unwrap();
        let referer = client.traffic_checker_page("example.com", TrafficMode::Exact);

        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v4/stGetFreeTrafficOverview")
                    .query_param(
                        "input",
                        r#"{"captcha":"T","country":"None","protocol":"None","mode":"exact","url":"example.com"}"#,
                    )
                    .header("referer", referer);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!(["Ok", {"traffic": {"trafficMonthlyAvg": 42}}]));
            })
            .await;

        let overview = client.traffic("T", "example.com", "None", TrafficMode::Exact).await.unwrap();

        assert_eq!(overview.traffic.traffic_monthly_avg, Number::from(42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_traffic_bad_status_is_absent() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/stGetFreeTrafficOverview");
                then.status(429).body("slow down");
            })
            .await;

        let client = AhrefsClient::new(AhrefsConfig { base_url: server.base_url(), ..Default::default() }).unwrap();
        assert!(client.traffic("T", "example.com", "us", TrafficMode::Subdomains).await.is_none());
    }
}
