//! HTTP client for the `/api/task` endpoints.
//!
//! Every failure goes through one normalization path and comes out as a
//! [`ClientError`] with a human-readable message: transport problems as
//! `Error: ...`, non-success statuses as `Error Code: ...\nMessage: ...`.

use crate::domain::models::{NewTask, PlannerTask};
use crate::infrastructure::basic_auth::BasicCredentials;
use crate::presentation::handlers::ErrorResponse;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5193/api";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a usable response.
    #[error("Error: {message}")]
    Transport { message: String },
    #[error("Error Code: {status}\nMessage: {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport { .. } => None,
            ClientError::Server { status, .. } => Some(*status),
        }
    }
}

#[derive(Clone)]
pub struct TaskClient {
    http: Client,
    base_url: String,
    credentials: Option<BasicCredentials>,
}

impl Default for TaskClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: BasicCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[instrument(skip(self))]
    pub async fn get_tasks(&self) -> Result<Vec<PlannerTask>, ClientError> {
        let resp = self.send(self.http.get(self.url(""))).await?;
        read_json(resp).await
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, task_id: i64) -> Result<PlannerTask, ClientError> {
        let resp = self.send(self.http.get(self.url(&format!("/{}", task_id)))).await?;
        read_json(resp).await
    }

    #[instrument(skip(self, task), fields(task_name = %task.task_name))]
    pub async fn create_task(&self, task: &NewTask) -> Result<PlannerTask, ClientError> {
        let resp = self.send(self.http.post(self.url("")).json(task)).await?;
        read_json(resp).await
    }

    #[instrument(skip(self, task), fields(task_id = task.task_id))]
    pub async fn update_task(&self, task: &PlannerTask) -> Result<PlannerTask, ClientError> {
        // The body carries `taskId`, which must match the path.
        let resp = self
            .send(self.http.put(self.url(&format!("/{}", task.task_id))).json(task))
            .await?;
        read_json(resp).await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: i64) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/{}", task_id))))
            .await?;
        Ok(())
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/task{}", self.base_url, suffix)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match &self.credentials {
            Some(credentials) => request.basic_auth(&credentials.email, Some(&credentials.password)),
            None => request,
        };
        let resp = request.send().await.map_err(handle_error)?;
        check_status(resp).await
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.details.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    let err = ClientError::Server {
        status: status.as_u16(),
        message,
    };
    error!(error = %err, "Task request failed");
    Err(err)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    resp.json::<T>().await.map_err(handle_error)
}

// Statuses are handled by `check_status`; anything reaching here is a
// connection or decoding failure.
fn handle_error(err: reqwest::Error) -> ClientError {
    debug!(error = ?err, "Transport failure");
    let err = ClientError::Transport {
        message: err.to_string(),
    };
    error!(error = %err, "Task request failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let transport = ClientError::Transport {
            message: "connection refused".to_string(),
        };
        let server = ClientError::Server {
            status: 404,
            message: "Task with ID 9 not found.".to_string(),
        };

        assert_eq!(transport.to_string(), "Error: connection refused");
        assert_eq!(
            server.to_string(),
            "Error Code: 404\nMessage: Task with ID 9 not found."
        );
        assert_eq!(transport.status(), None);
        assert_eq!(server.status(), Some(404));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TaskClient::new("http://localhost:5193/api/");

        assert_eq!(client.url("/3"), "http://localhost:5193/api/task/3");
    }
}
