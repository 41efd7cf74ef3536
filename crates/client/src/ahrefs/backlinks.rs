//! Top backlinks list.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use seo_mcp_core::CachedAuthorization;

use super::envelope::{EnvelopeError, Tagged, lenient, number_or_zero, zero};
use super::{AhrefsClient, absent_on_error};

const BACKLINKS_ENDPOINT: &str = "stGetFreeBacklinksList";

/// One linking page. Missing, null or off-type fields read as `""`, `0` or `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backlink {
    #[serde(default, deserialize_with = "lenient")]
    pub anchor: String,
    #[serde(default = "zero", deserialize_with = "number_or_zero")]
    pub domain_rating: Number,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url_from: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url_to: String,
    #[serde(default, deserialize_with = "lenient")]
    pub edu: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub gov: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BacklinksPayload {
    top_backlinks: TopBacklinks,
}

#[derive(Debug, Deserialize)]
struct TopBacklinks {
    #[serde(default, deserialize_with = "lenient")]
    backlinks: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BacklinksRequest<'a> {
    report_type: &'a str,
    signed_input: SignedRequestInput<'a>,
}

#[derive(Debug, Serialize)]
struct SignedRequestInput<'a> {
    signature: &'a str,
    input: ReportInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportInput<'a> {
    valid_until: &'a str,
    mode: &'a str,
    url: String,
}

/// Read `topBacklinks.backlinks` from element 1 of the reply, whatever its tag.
///
/// Records that are not objects are dropped; the rest are kept.
pub fn extract_backlinks(reply: Value) -> Result<Vec<Backlink>, EnvelopeError> {
    let payload: BacklinksPayload = Tagged::leading(reply)?.into_payload()?;

    Ok(payload
        .top_backlinks
        .backlinks
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect())
}

impl AhrefsClient {
    /// Top backlinks for the domain `auth` was issued for.
    ///
    /// Presents the signature together with the exact `validUntil` it was
    /// issued with.
    pub async fn backlinks(&self, auth: &CachedAuthorization) -> Option<Vec<Backlink>> {
        let body = BacklinksRequest {
            report_type: "TopBacklinks",
            signed_input: SignedRequestInput {
                signature: &auth.signature,
                input: ReportInput { valid_until: &auth.valid_until, mode: "subdomains", url: format!("{}/", auth.key) },
            },
        };

        let reply = absent_on_error(BACKLINKS_ENDPOINT, self.post_json(BACKLINKS_ENDPOINT, &body).await)?;
        let backlinks = absent_on_error(BACKLINKS_ENDPOINT, extract_backlinks(reply))?;

        tracing::debug!(domain = %auth.key, count = backlinks.len(), "backlinks retrieved");
        Some(backlinks)
    }
}
