//! Signed authorization for the backlinks list.
//!
//! A verification token is exchanged at `stGetFreeBacklinksOverview` for a
//! signature valid until a given instant. The signature is cached per domain
//! and reused until it expires, which saves a captcha solve per call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use seo_mcp_core::cache::hash::fingerprint;
use seo_mcp_core::{CachedAuthorization, Error, SignatureStore};

use super::envelope::Tagged;
use super::{AcquisitionError, AhrefsClient};
use crate::captcha::CaptchaClient;

const OVERVIEW_ENDPOINT: &str = "stGetFreeBacklinksOverview";

/// Query mode used for every signature request.
const SIGNATURE_MODE: &str = "subdomains";

#[derive(Debug, Serialize)]
struct OverviewRequest<'a> {
    captcha: &'a str,
    mode: &'a str,
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct OverviewPayload {
    #[serde(rename = "signedInput")]
    signed_input: SignedInput,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct SignedInput {
    signature: String,
    input: SignedWindow,
}

#[derive(Debug, Deserialize)]
struct SignedWindow {
    #[serde(rename = "validUntil")]
    valid_until: String,
}

/// Pull the signature, expiry and overview out of an overview reply.
///
/// Anything but the exact expected shape is `UnexpectedFormat`.
pub fn extract_authorization(domain: &str, reply: Value) -> Result<CachedAuthorization, AcquisitionError> {
    let payload: OverviewPayload = Tagged::pair(reply)
        .and_then(Tagged::into_ok)
        .map_err(|e| AcquisitionError::UnexpectedFormat(e.to_string()))?;

    let overview = match payload.data {
        Value::Null => None,
        data => Some(data),
    };

    let valid_until = payload.signed_input.input.valid_until;
    CachedAuthorization::new(domain, payload.signed_input.signature, valid_until.clone(), overview)
        .ok_or_else(|| AcquisitionError::UnexpectedFormat(format!("validUntil is not an instant: {valid_until}")))
}

impl AhrefsClient {
    /// Exchange a verification token for a signed authorization for `domain`.
    ///
    /// Writes the result through to `store`. A failed write is logged and
    /// the fresh authorization is returned anyway.
    pub async fn acquire(
        &self, token: &str, domain: &str, store: &dyn SignatureStore,
    ) -> Result<CachedAuthorization, AcquisitionError> {
        let body = OverviewRequest { captcha: token, mode: SIGNATURE_MODE, url: domain };
        let reply = self.post_json(OVERVIEW_ENDPOINT, &body).await?;
        let authorization = extract_authorization(domain, reply)?;

        tracing::info!(
            domain,
            signature = %fingerprint(&authorization.signature),
            valid_until = %authorization.valid_until,
            "obtained signed authorization"
        );

        if let Err(e) = store.put(&authorization).await {
            tracing::warn!(domain, "failed to cache signature: {}", e);
        }

        Ok(authorization)
    }

    /// Signed authorization for `domain`, from the cache when still valid,
    /// otherwise via a captcha solve and a fresh exchange.
    ///
    /// Captcha and exchange failures are terminal; nothing is retried.
    pub async fn authorize(
        &self, domain: &str, captcha: &CaptchaClient, store: &dyn SignatureStore,
    ) -> Result<CachedAuthorization, Error> {
        match store.get(domain).await {
            Ok(Some(cached)) => {
                tracing::debug!(domain, "using cached signature");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(domain, "signature cache unreadable, treating as miss: {}", e),
        }

        let token = captcha.solve(&self.backlink_checker_page(domain)).await?;
        Ok(self.acquire(&token, domain, store).await?)
    }
}
