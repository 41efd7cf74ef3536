//! CapSolver response types and task state classification.

use serde::Deserialize;

/// Reply to `POST /createTask`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    #[serde(default)]
    pub error_id: Option<i64>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Reply to `POST /getTaskResult`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResultResponse {
    #[serde(default)]
    pub error_id: Option<i64>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub solution: Option<Solution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub token: Option<String>,
}

/// Polling state of a submitted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Ready(String),
    Failed(String),
}

impl CreateTaskResponse {
    /// The task id, if the solver accepted the task.
    pub fn accepted_task_id(&self) -> Option<&str> {
        self.task_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn rejection_reason(&self) -> String {
        describe(&self.error_code, &self.error_description).unwrap_or_else(|| "no task id returned".to_string())
    }
}

impl TaskResultResponse {
    /// Classify this poll reply.
    ///
    /// `ready` wins over everything else; `failed` or a non-zero `errorId`
    /// is terminal; any other status means keep polling.
    pub fn state(&self) -> TaskState {
        if self.status.as_deref() == Some("ready") {
            return match self.solution.as_ref().and_then(|s| s.token.clone()) {
                Some(token) if !token.is_empty() => TaskState::Ready(token),
                _ => TaskState::Failed("task ready without a token".to_string()),
            };
        }

        if self.status.as_deref() == Some("failed") || self.error_id.is_some_and(|id| id != 0) {
            let reason = describe(&self.error_code, &self.error_description)
                .unwrap_or_else(|| format!("status {}", self.status.as_deref().unwrap_or("unknown")));
            return TaskState::Failed(reason);
        }

        TaskState::Pending
    }
}

fn describe(code: &Option<String>, description: &Option<String>) -> Option<String> {
    match (code.as_deref(), description.as_deref()) {
        (Some(code), Some(desc)) => Some(format!("{code}: {desc}")),
        (Some(code), None) => Some(code.to_string()),
        (None, Some(desc)) => Some(desc.to_string()),
        (None, None) => None,
    }
}
