//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SEO_MCP_*)
//! 2. TOML config file (if SEO_MCP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Fallback environment variable for the solver key, read when the prefixed one is unset.
const CAPSOLVER_KEY_FALLBACK_ENV: &str = "CAPSOLVER_API_KEY";

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP mounted at `/mcp`.
    Http,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SEO_MCP_*)
/// 2. TOML config file (if SEO_MCP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// CapSolver client key used for every captcha solve.
    ///
    /// Set via SEO_MCP_CAPSOLVER_API_KEY (or CAPSOLVER_API_KEY).
    /// Required by every tool; checked when a tool is called.
    #[serde(default)]
    pub capsolver_api_key: Option<String>,

    /// Path to the JSON signature cache document.
    ///
    /// Set via SEO_MCP_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Origin of the analytics provider (API and captcha target pages).
    #[serde(default = "default_ahrefs_base_url")]
    pub ahrefs_base_url: String,

    /// Origin of the captcha solving service.
    #[serde(default = "default_capsolver_base_url")]
    pub capsolver_base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SEO_MCP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SEO_MCP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay before each captcha result poll, in milliseconds.
    #[serde(default = "default_captcha_poll_interval_ms")]
    pub captcha_poll_interval_ms: u64,

    /// Total time a single captcha solve may take, in milliseconds.
    #[serde(default = "default_captcha_timeout_ms")]
    pub captcha_timeout_ms: u64,

    /// Transport the server binds to.
    ///
    /// Set via SEO_MCP_TRANSPORT (`stdio` or `http`).
    #[serde(default = "default_transport")]
    pub transport: Transport,

    /// Socket address for the HTTP transport.
    #[serde(default = "default_http_bind")]
    pub http_bind: String,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./signature_cache.json")
}

fn default_ahrefs_base_url() -> String {
    "https://ahrefs.com".into()
}

fn default_capsolver_base_url() -> String {
    "https://api.capsolver.com".into()
}

fn default_user_agent() -> String {
    "seo-mcp/0.1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_captcha_poll_interval_ms() -> u64 {
    1_000
}

fn default_captcha_timeout_ms() -> u64 {
    120_000
}

fn default_transport() -> Transport {
    Transport::Stdio
}

fn default_http_bind() -> String {
    "0.0.0.0:8010".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capsolver_api_key: None,
            cache_path: default_cache_path(),
            ahrefs_base_url: default_ahrefs_base_url(),
            capsolver_base_url: default_capsolver_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            captcha_poll_interval_ms: default_captcha_poll_interval_ms(),
            captcha_timeout_ms: default_captcha_timeout_ms(),
            transport: default_transport(),
            http_bind: default_http_bind(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn captcha_poll_interval(&self) -> Duration {
        Duration::from_millis(self.captcha_poll_interval_ms)
    }

    pub fn captcha_timeout(&self) -> Duration {
        Duration::from_millis(self.captcha_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SEO_MCP_`
    /// 2. TOML file from `SEO_MCP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// `CAPSOLVER_API_KEY` fills in the solver key when no other source set it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SEO_MCP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SEO_MCP_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        if config.capsolver_api_key.is_none()
            && let Ok(key) = std::env::var(CAPSOLVER_KEY_FALLBACK_ENV)
            && !key.is_empty()
        {
            config.capsolver_api_key = Some(key);
        }

        config.validate()?;

        Ok(config)
    }

    /// Check if the CapSolver key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is unset or blank.
    pub fn require_capsolver_api_key(&self) -> Result<&str, ConfigError> {
        self.capsolver_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "capsolver_api_key".into(),
                hint: "Set SEO_MCP_CAPSOLVER_API_KEY or CAPSOLVER_API_KEY environment variable".into(),
            })
    }
}
