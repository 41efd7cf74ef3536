//! CapSolver captcha client.
//!
//! Turns a target page URL into a one-time verification token.
//!
//! ### Protocol
//!
//! - **Submit**: `POST {base}/createTask` with an `AntiTurnstileTaskProxyLess`
//!   task for the page and the provider's fixed site key. No `taskId` in the
//!   reply fails with `SubmissionFailed`.
//! - **Poll**: sleep one interval, then `POST {base}/getTaskResult`. `ready`
//!   returns `solution.token`; `failed` or a non-zero `errorId` fails with
//!   `SolveFailed`; anything else polls again.
//! - **Bound**: the whole poll loop runs under `max_wait` and fails with
//!   `Timeout` when it runs out. Dropping the future cancels it at the next
//!   await point.

pub mod error;
pub mod request;
pub mod response;

pub use error::CaptchaError;
pub use request::{CreateTaskRequest, TaskResultRequest};
pub use response::{CreateTaskResponse, TaskResultResponse, TaskState};

use async_trait::async_trait;
use reqwest::header;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for CapSolver.
const DEFAULT_BASE_URL: &str = "https://api.capsolver.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "seo-mcp/0.1";

/// Delay before each result poll.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Budget for one complete solve.
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Captcha client configuration.
#[derive(Debug, Clone)]
pub struct CaptchaConfig {
    /// CapSolver client key.
    pub api_key: String,
    /// Base URL (default: https://api.capsolver.com).
    pub base_url: String,
    /// Per-request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string (default: seo-mcp/0.1).
    pub user_agent: String,
    /// Delay before each poll (default: 1s).
    pub poll_interval: Duration,
    /// Total solve budget (default: 120s).
    pub max_wait: Duration,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

/// The two calls of the solver's task protocol.
#[async_trait]
pub trait SolverApi: Send + Sync {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreateTaskResponse, CaptchaError>;

    async fn get_task_result(&self, request: &TaskResultRequest) -> Result<TaskResultResponse, CaptchaError>;
}

/// `SolverApi` over HTTP.
#[derive(Debug, Clone)]
pub struct CapSolverApi {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl CapSolverApi {
    pub fn new(config: &CaptchaConfig) -> Result<Self, CaptchaError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CaptchaError::Network(Arc::new(e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// POST a JSON body and decode the reply. The solver reports its own
    /// errors in the body, so the status code is only used for diagnostics.
    async fn post<B: Serialize + Sync, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, CaptchaError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .header(header::USER_AGENT, &self.user_agent)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| CaptchaError::Parse(format!("{path} (HTTP {status}): {e}")))
    }
}

#[async_trait]
impl SolverApi for CapSolverApi {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreateTaskResponse, CaptchaError> {
        self.post("createTask", request).await
    }

    async fn get_task_result(&self, request: &TaskResultRequest) -> Result<TaskResultResponse, CaptchaError> {
        self.post("getTaskResult", request).await
    }
}

/// Solves Turnstile captchas for provider pages.
#[derive(Clone)]
pub struct CaptchaClient {
    api: Arc<dyn SolverApi>,
    api_key: String,
    poll_interval: Duration,
    max_wait: Duration,
}

impl std::fmt::Debug for CaptchaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptchaClient")
            .field("poll_interval", &self.poll_interval)
            .field("max_wait", &self.max_wait)
            .finish_non_exhaustive()
    }
}

impl CaptchaClient {
    /// Create a client talking to CapSolver over HTTP.
    pub fn new(config: CaptchaConfig) -> Result<Self, CaptchaError> {
        let api = CapSolverApi::new(&config)?;
        Self::with_api(Arc::new(api), config)
    }

    /// Create a client over any `SolverApi` implementation.
    pub fn with_api(api: Arc<dyn SolverApi>, config: CaptchaConfig) -> Result<Self, CaptchaError> {
        if config.api_key.trim().is_empty() {
            return Err(CaptchaError::MissingApiKey);
        }

        Ok(Self { api, api_key: config.api_key, poll_interval: config.poll_interval, max_wait: config.max_wait })
    }

    /// Solve the captcha guarding `target_url` and return the verification token.
    pub async fn solve(&self, target_url: &str) -> Result<String, CaptchaError> {
        let start = Instant::now();
        let created = self
            .api
            .create_task(&CreateTaskRequest::turnstile(&self.api_key, target_url))
            .await?;

        let Some(task_id) = created.accepted_task_id() else {
            let reason = created.rejection_reason();
            tracing::warn!(target_url, reason = %reason, "captcha task rejected");
            return Err(CaptchaError::SubmissionFailed(reason));
        };

        tracing::debug!(task_id, target_url, "captcha task submitted");

        let request = TaskResultRequest { client_key: self.api_key.clone(), task_id: task_id.to_string() };
        let token = tokio::time::timeout(self.max_wait, self.poll(&request))
            .await
            .map_err(|_| CaptchaError::Timeout(self.max_wait))??;

        tracing::debug!(task_id, "captcha solved in {:?}", start.elapsed());

        Ok(token)
    }

    async fn poll(&self, request: &TaskResultRequest) -> Result<String, CaptchaError> {
        let mut polls = 0u32;
        loop {
            tokio::time::sleep(self.poll_interval).await;
            polls += 1;

            match self.api.get_task_result(request).await?.state() {
                TaskState::Ready(token) => {
                    tracing::debug!(task_id = %request.task_id, polls, "captcha task ready");
                    return Ok(token);
                }
                TaskState::Failed(reason) => {
                    tracing::warn!(task_id = %request.task_id, polls, reason = %reason, "captcha task failed");
                    return Err(CaptchaError::SolveFailed(reason));
                }
                TaskState::Pending => {
                    tracing::trace!(task_id = %request.task_id, polls, "captcha task pending");
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted solver for exercising the poll loop.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct ScriptedSolver {
        create: Mutex<Option<CreateTaskResponse>>,
        results: Mutex<VecDeque<TaskResultResponse>>,
        pub(crate) submissions: AtomicUsize,
        pub(crate) polls: AtomicUsize,
    }

    impl ScriptedSolver {
        pub(crate) fn new(create: CreateTaskResponse, results: Vec<TaskResultResponse>) -> Self {
            Self {
                create: Mutex::new(Some(create)),
                results: Mutex::new(results.into()),
                submissions: AtomicUsize::new(0),
                polls: AtomicUsize::new(0),
            }
        }

        /// Accepts the task and replays `statuses`; the last one repeats forever.
        pub(crate) fn accepting(statuses: Vec<TaskResultResponse>) -> Self {
            Self::new(CreateTaskResponse { task_id: Some("task-1".into()), ..Default::default() }, statuses)
        }
    }

    pub(crate) fn pending() -> TaskResultResponse {
        TaskResultResponse { error_id: Some(0), status: Some("processing".into()), ..Default::default() }
    }

    pub(crate) fn ready(token: &str) -> TaskResultResponse {
        TaskResultResponse {
            error_id: Some(0),
            status: Some("ready".into()),
            solution: Some(response::Solution { token: Some(token.into()) }),
            ..Default::default()
        }
    }

    pub(crate) fn failed() -> TaskResultResponse {
        TaskResultResponse { error_id: Some(0), status: Some("failed".into()), ..Default::default() }
    }

    #[async_trait]
    impl SolverApi for ScriptedSolver {
        async fn create_task(&self, _request: &CreateTaskRequest) -> Result<CreateTaskResponse, CaptchaError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            Ok(self.create.lock().unwrap().clone().unwrap_or_default())
        }

        async fn get_task_result(&self, _request: &TaskResultRequest) -> Result<TaskResultResponse, CaptchaError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut results = self.results.lock().unwrap();
            let next = if results.len() > 1 { results.pop_front() } else { results.front().cloned() };
            Ok(next.unwrap_or_else(pending))
        }
    }

    pub(crate) fn fast_config() -> CaptchaConfig {
        CaptchaConfig {
            api_key: "CAP-test".into(),
            poll_interval: Duration::from_millis(1),
            max_wait: Duration::from_millis(500),
            ..Default::default()
        }
    }
}
