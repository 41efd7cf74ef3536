//! Shared upstream clients and the signature cache, built once at startup.

use std::sync::Arc;

use seo_mcp_client::{AhrefsClient, AhrefsConfig, CaptchaClient, CaptchaConfig, CaptchaError};
use seo_mcp_core::{AppConfig, Error, FileSignatureStore, SignatureStore};

/// Everything a tool call needs.
#[derive(Clone)]
pub struct Services {
    pub ahrefs: AhrefsClient,
    /// `None` when no solver key is configured; every tool then fails with a
    /// configuration error.
    captcha: Option<CaptchaClient>,
    pub store: Arc<dyn SignatureStore>,
}

impl Services {
    pub fn new(ahrefs: AhrefsClient, captcha: Option<CaptchaClient>, store: Arc<dyn SignatureStore>) -> Self {
        Self { ahrefs, captcha, store }
    }

    /// Build the HTTP clients and the file-backed cache from configuration.
    ///
    /// A missing solver key is not an error here; it is reported per call.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let ahrefs = AhrefsClient::new(AhrefsConfig {
            base_url: config.ahrefs_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
        .map_err(|e| Error::Configuration(format!("failed to build upstream client: {e}")))?;

        let captcha = match config.require_capsolver_api_key() {
            Ok(api_key) => Some(CaptchaClient::new(CaptchaConfig {
                api_key: api_key.to_string(),
                base_url: config.capsolver_base_url.clone(),
                timeout: config.timeout(),
                user_agent: config.user_agent.clone(),
                poll_interval: config.captcha_poll_interval(),
                max_wait: config.captcha_timeout(),
            })?),
            Err(_) => None,
        };

        tracing::info!(cache_path = %config.cache_path.display(), "signature cache");
        let store = Arc::new(FileSignatureStore::new(&config.cache_path));

        Ok(Self::new(ahrefs, captcha, store))
    }

    /// The captcha client, or a configuration error when no key is set.
    pub fn captcha(&self) -> Result<&CaptchaClient, Error> {
        self.captcha.as_ref().ok_or_else(|| CaptchaError::MissingApiKey.into())
    }
}
