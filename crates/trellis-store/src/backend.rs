//! The persistence collaborator seam. [`Backend`] is the REST surface
//! the store talks to; [`HttpBackend`] is the reqwest implementation of
//! the documented routes. Tests inject their own backend with failure
//! injection instead.

use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};
use trellis_core::task::TaskId;
use trellis_wire::{CreateBody, DecodeError, PatchBody, TaskRecord};

use crate::config::StoreConfig;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}")]
    Status { status: StatusCode },

    #[error("task {0} does not exist on the backend")]
    NotFound(TaskId),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// The remote task collection, in wire records.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, BackendError>;
    async fn create_task(&self, body: CreateBody) -> Result<TaskRecord, BackendError>;
    async fn update_task(&self, id: TaskId, body: PatchBody) -> Result<TaskRecord, BackendError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), BackendError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &StoreConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }
}

fn check_status(response: Response, id: Option<TaskId>) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND
        && let Some(id) = id
    {
        return Err(BackendError::NotFound(id));
    }
    Err(BackendError::Status { status })
}

impl Backend for HttpBackend {
    #[instrument(skip(self))]
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, BackendError> {
        let response = self.client.get(self.tasks_url()).send().await?;
        let records: Vec<TaskRecord> = check_status(response, None)?.json().await?;
        debug!(count = records.len(), "fetched task records");
        Ok(records)
    }

    #[instrument(skip(self, body))]
    async fn create_task(&self, body: CreateBody) -> Result<TaskRecord, BackendError> {
        let response = self.client.post(self.tasks_url()).json(&body).send().await?;
        Ok(check_status(response, None)?.json().await?)
    }

    #[instrument(skip(self, body), fields(task = %id))]
    async fn update_task(&self, id: TaskId, body: PatchBody) -> Result<TaskRecord, BackendError> {
        let response = self
            .client
            .patch(self.task_url(id))
            .json(&body)
            .send()
            .await?;
        Ok(check_status(response, Some(id))?.json().await?)
    }

    #[instrument(skip(self), fields(task = %id))]
    async fn delete_task(&self, id: TaskId) -> Result<(), BackendError> {
        let response = self.client.delete(self.task_url(id)).send().await?;
        check_status(response, Some(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::HttpBackend;
    use crate::config::StoreConfig;

    #[test]
    fn route_urls_tolerate_a_trailing_slash() {
        let config = StoreConfig {
            base_url: "http://planner.local:9000/".to_string(),
            ..StoreConfig::default()
        };
        let backend = HttpBackend::new(&config).expect("build backend");
        assert_eq!(backend.tasks_url(), "http://planner.local:9000/tasks");

        let id = Uuid::nil();
        assert_eq!(
            backend.task_url(id),
            format!("http://planner.local:9000/tasks/{id}")
        );
    }
}
