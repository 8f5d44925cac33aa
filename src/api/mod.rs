//! Access to the task backend.

mod http;
pub use http::HttpApi;

#[cfg(test)]
pub mod memory;

use crate::error::ApiError;
use crate::settings::Settings;
use crate::task::{NewTask, Task, TaskPatch};

/// Operations the board needs from the backend.
///
/// Every call is a single blocking request; callers refresh their snapshot
/// after a successful mutation.
pub trait TaskApi {
    fn health(&self) -> Result<(), ApiError>;

    fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;

    fn patch_task(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError>;

    fn settings(&self) -> Result<Settings, ApiError>;

    fn update_settings(&self, settings: &Settings) -> Result<Settings, ApiError>;

    fn responsibles(&self) -> Result<Vec<String>, ApiError>;
}
