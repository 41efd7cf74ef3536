//! Cached authorization records and their on-disk form.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A signed authorization for one domain, as handed out by the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAuthorization {
    /// Domain the authorization applies to.
    pub key: String,
    /// Opaque signature issued upstream.
    pub signature: String,
    /// `validUntil` exactly as issued. The upstream verifies the signed input
    /// byte for byte, so this is what gets sent back.
    pub valid_until: String,
    /// `valid_until` as an absolute instant.
    pub expires_at: DateTime<Utc>,
    /// Overview payload returned alongside the signature.
    pub overview: Option<Value>,
    /// When this entry was written, if known.
    pub obtained_at: Option<DateTime<Utc>>,
}

impl CachedAuthorization {
    /// Build a fresh entry obtained now.
    ///
    /// Returns `None` if `valid_until` is not a parseable instant.
    pub fn new(
        key: impl Into<String>, signature: impl Into<String>, valid_until: impl Into<String>, overview: Option<Value>,
    ) -> Option<Self> {
        let valid_until = valid_until.into();
        let expires_at = parse_instant(&valid_until)?;

        Some(Self {
            key: key.into(),
            signature: signature.into(),
            valid_until,
            expires_at,
            overview,
            obtained_at: Some(Utc::now()),
        })
    }

    /// Whether the signature may still be presented at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Rebuild from the persisted form. Entries whose expiry cannot be parsed are dropped.
    pub fn from_stored(key: &str, stored: StoredEntry) -> Option<Self> {
        let expires_at = parse_instant(&stored.valid_until)?;
        let obtained_at = stored.timestamp.as_deref().and_then(parse_instant);

        Some(Self {
            key: key.to_string(),
            signature: stored.signature,
            valid_until: stored.valid_until,
            expires_at,
            overview: stored.overview_data,
            obtained_at,
        })
    }

    pub fn to_stored(&self) -> StoredEntry {
        StoredEntry {
            signature: self.signature.clone(),
            valid_until: self.valid_until.clone(),
            overview_data: self.overview.clone(),
            timestamp: Some(self.obtained_at.unwrap_or_else(Utc::now).to_rfc3339()),
        }
    }
}

/// One value of the persisted cache document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub signature: String,
    pub valid_until: String,
    #[serde(default)]
    pub overview_data: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Parse an ISO-8601 instant into UTC.
///
/// A trailing `Z` is rewritten to `+00:00` first. Timestamps without an
/// offset are taken to be UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
