use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::TaskApi;
use crate::error::ApiError;
use crate::settings::Settings;
use crate::task::{NewTask, Task, TaskPatch};

/// JSON-over-HTTP client for the task backend.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "sending request");
        let response = request
            .send()
            .inspect_err(|e| warn!(endpoint, "request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = error_message(status.as_u16(), &body);
            warn!(endpoint, status = status.as_u16(), "backend rejected request: {}", message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })
    }
}

impl TaskApi for HttpApi {
    fn health(&self) -> Result<(), ApiError> {
        let _: Value = self.send("GET /health", self.client.get(self.url("/health")))?;
        Ok(())
    }

    fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.send("GET /tasks", self.client.get(self.url("/tasks")))
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.send("POST /tasks", self.client.post(self.url("/tasks")).json(task))
    }

    fn patch_task(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.send(
            "PATCH /tasks/{id}",
            self.client.patch(self.url(&format!("/tasks/{id}"))).json(patch),
        )
    }

    fn settings(&self) -> Result<Settings, ApiError> {
        self.send("GET /settings", self.client.get(self.url("/settings")))
    }

    fn update_settings(&self, settings: &Settings) -> Result<Settings, ApiError> {
        self.send(
            "PATCH /settings",
            self.client.patch(self.url("/settings")).json(settings),
        )
    }

    fn responsibles(&self) -> Result<Vec<String>, ApiError> {
        self.send("GET /responsibles", self.client.get(self.url("/responsibles")))
    }
}

/// Message shown for a non-2xx response: the body's `detail`, else its
/// `error`, else the bare status code.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "error"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
            })
        })
        .unwrap_or_else(|| format!("Error HTTP {status}"))
}
