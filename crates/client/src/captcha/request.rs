//! CapSolver request bodies.

use serde::Serialize;

/// Turnstile site key of the analytics provider's pages.
pub const TURNSTILE_SITE_KEY: &str = "0x4AAAAAAAAzi9ITzSN9xKMi";

/// Task type for proxyless Cloudflare Turnstile solving.
pub const TURNSTILE_TASK_TYPE: &str = "AntiTurnstileTaskProxyLess";

/// Body of `POST /createTask`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub client_key: String,
    pub task: TurnstileTask,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnstileTask {
    #[serde(rename = "type")]
    pub kind: String,
    pub website_key: String,
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub metadata: TaskMetadata,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskMetadata {
    pub action: String,
}

/// Body of `POST /getTaskResult`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResultRequest {
    pub client_key: String,
    pub task_id: String,
}

impl CreateTaskRequest {
    /// Turnstile task for `website_url` with the fixed provider site key.
    pub fn turnstile(client_key: &str, website_url: &str) -> Self {
        Self {
            client_key: client_key.to_string(),
            task: TurnstileTask {
                kind: TURNSTILE_TASK_TYPE.to_string(),
                website_key: TURNSTILE_SITE_KEY.to_string(),
                website_url: website_url.to_string(),
                metadata: TaskMetadata::default(),
            },
        }
    }
}
