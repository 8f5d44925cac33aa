//! In-process backend used by the board tests.

use std::cell::{Cell, RefCell};

use super::TaskApi;
use crate::error::ApiError;
use crate::settings::Settings;
use crate::task::{NewTask, Task, TaskPatch};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(NewTask),
    Patch(u64, TaskPatch),
    Settings(Settings),
}

#[derive(Default)]
pub struct InMemoryApi {
    tasks: RefCell<Vec<Task>>,
    settings: Cell<Option<Settings>>,
    responsibles: RefCell<Option<Vec<String>>>,
    mutations: RefCell<Vec<Mutation>>,
    fetches: Cell<usize>,
    list_budget: Cell<Option<usize>>,
    failure: RefCell<Option<String>>,
}

impl InMemoryApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks),
            ..Self::default()
        }
    }

    pub fn with_settings(self, max_in_progress: u32) -> Self {
        self.settings.set(Some(Settings { max_in_progress }));
        self
    }

    pub fn with_responsibles(self, names: &[&str]) -> Self {
        *self.responsibles.borrow_mut() = Some(names.iter().map(|n| (*n).to_owned()).collect());
        self
    }

    /// Makes every following call fail with a 500 carrying `detail`.
    pub fn fail_with(&self, detail: &str) {
        *self.failure.borrow_mut() = Some(detail.to_owned());
    }

    /// Lets `list_tasks` succeed `calls` more times, then answers 503 `busy`.
    pub fn fail_list_after(&self, calls: usize) {
        self.list_budget.set(Some(self.fetches.get() + calls));
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.borrow().clone()
    }

    pub fn task_fetches(&self) -> usize {
        self.fetches.get()
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.failure.borrow().as_ref() {
            Some(detail) => Err(ApiError::Status {
                status: 500,
                message: detail.clone(),
            }),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "Not Found".to_owned(),
        }
    }
}

impl TaskApi for InMemoryApi {
    fn health(&self) -> Result<(), ApiError> {
        self.check()
    }

    fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.check()?;
        if self.list_budget.get().is_some_and(|limit| self.fetches.get() >= limit) {
            return Err(ApiError::Status {
                status: 503,
                message: "busy".to_owned(),
            });
        }
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.tasks.borrow().clone())
    }

    fn create_task(&self, new_task: &NewTask) -> Result<Task, ApiError> {
        self.check()?;
        self.mutations
            .borrow_mut()
            .push(Mutation::Create(new_task.clone()));
        let mut tasks = self.tasks.borrow_mut();
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task {
            id,
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            status: new_task.status.unwrap_or_default(),
            estimated_time: new_task.estimated_time,
            actual_time: None,
            comments: None,
            responsible: new_task.responsible.clone(),
        };
        tasks.push(task.clone());
        Ok(task)
    }

    fn patch_task(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.check()?;
        self.mutations
            .borrow_mut()
            .push(Mutation::Patch(id, patch.clone()));
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(comments) = &patch.comments {
            task.comments = Some(comments.clone());
        }
        if let Some(actual_time) = patch.actual_time {
            task.actual_time = Some(actual_time);
        }
        Ok(task.clone())
    }

    fn settings(&self) -> Result<Settings, ApiError> {
        self.check()?;
        self.settings.get().ok_or_else(Self::not_found)
    }

    fn update_settings(&self, settings: &Settings) -> Result<Settings, ApiError> {
        self.check()?;
        self.mutations
            .borrow_mut()
            .push(Mutation::Settings(*settings));
        self.settings.set(Some(*settings));
        Ok(*settings)
    }

    fn responsibles(&self) -> Result<Vec<String>, ApiError> {
        self.check()?;
        self.responsibles.borrow().clone().ok_or_else(Self::not_found)
    }
}
