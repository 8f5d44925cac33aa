use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::api::TaskApi;
use crate::error::BoardError;
use crate::settings::{self, Settings};
use crate::task::{Completion, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::wip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Back,
    Forward,
}

/// A transition that passed the edge and WIP checks but is not sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub task_id: u64,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl PendingMove {
    /// Entering DONE asks for comments and the real time spent.
    pub fn needs_completion(&self) -> bool {
        self.to == TaskStatus::Done && self.from != TaskStatus::Done
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardStats {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub max_in_progress: u32,
    pub estimated_hours: f64,
    pub actual_hours: f64,
}

/// Client-side view of the backend board.
///
/// Holds the most recently fetched snapshot and the cursor. Every mutation
/// is validated locally, sent, and followed by a refresh; on failure the
/// snapshot is left as it was.
pub struct KanbanBoard<A> {
    api: A,
    pub tasks: Vec<Task>,
    pub fetched_at: Option<DateTime<Local>>,
    pub load_error: Option<String>,
    pub max_in_progress: u32,
    pub responsibles: Vec<String>,
    pub selected_status: usize,
    pub selected_task: usize,
    fallback_limit: u32,
}

impl<A: TaskApi> KanbanBoard<A> {
    pub fn new(api: A, fallback_limit: u32) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            fetched_at: None,
            load_error: None,
            max_in_progress: fallback_limit,
            responsibles: Vec::new(),
            selected_status: 0,
            selected_task: 0,
            fallback_limit,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Re-fetches tasks, the WIP limit and the responsibles list.
    ///
    /// Only the task list is mandatory; backends without `/settings` or
    /// `/responsibles` fall back to the configured limit and a free-form
    /// responsible.
    pub fn refresh(&mut self) -> Result<(), BoardError> {
        let tasks = match self.api.list_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                self.load_error = Some(e.to_string());
                return Err(e.into());
            }
        };
        debug!(count = tasks.len(), "fetched tasks");
        self.tasks = tasks;
        self.fetched_at = Some(Local::now());
        self.load_error = None;

        self.max_in_progress = match self.api.settings() {
            Ok(settings) => settings.max_in_progress,
            Err(e) => {
                debug!("settings unavailable, using fallback limit: {}", e);
                self.fallback_limit
            }
        };
        self.load_responsibles();

        self.clamp_selection();
        Ok(())
    }

    /// Fetches only the responsibles list; an unavailable list means free text.
    pub fn load_responsibles(&mut self) {
        self.responsibles = self.api.responsibles().unwrap_or_else(|e| {
            debug!("responsibles unavailable: {}", e);
            Vec::new()
        });
    }

    pub fn get_tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn in_progress_count(&self) -> usize {
        wip::count_in_progress(&self.tasks)
    }

    pub fn find(&self, id: u64) -> Result<&Task, BoardError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(BoardError::UnknownTask { id })
    }

    pub fn selected_column(&self) -> TaskStatus {
        TaskStatus::ALL[self.selected_status.min(TaskStatus::ALL.len() - 1)]
    }

    pub fn selected(&self) -> Option<&Task> {
        self.get_tasks_by_status(self.selected_column())
            .get(self.selected_task)
            .copied()
    }

    pub fn select_column(&mut self, direction: MoveDirection) {
        match direction {
            MoveDirection::Back if self.selected_status > 0 => self.selected_status -= 1,
            MoveDirection::Forward if self.selected_status < TaskStatus::ALL.len() - 1 => {
                self.selected_status += 1
            }
            _ => {}
        }
        self.clamp_selection();
    }

    pub fn select_task(&mut self, direction: MoveDirection) {
        let len = self.get_tasks_by_status(self.selected_column()).len();
        match direction {
            MoveDirection::Back if self.selected_task > 0 => self.selected_task -= 1,
            MoveDirection::Forward if self.selected_task + 1 < len => self.selected_task += 1,
            _ => {}
        }
    }

    /// Keeps the cursor on the given task after a refresh.
    pub fn select_id(&mut self, id: u64) {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            let status = task.status;
            self.selected_status = status.column();
            self.selected_task = self
                .get_tasks_by_status(status)
                .iter()
                .position(|t| t.id == id)
                .unwrap_or(0);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.get_tasks_by_status(self.selected_column()).len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }

    /// Validates the draft, re-reads the board for the WIP check and
    /// creates the task.
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, BoardError> {
        let new_task = draft.validate(&self.responsibles)?;
        self.refresh()?;
        wip::check_transition(&self.tasks, None, draft.status, self.max_in_progress)?;

        let task = self.api.create_task(&new_task)?;
        info!(id = task.id, status = %task.status, "created task");
        self.refresh_after_mutation(task.id);
        Ok(task)
    }

    /// Edge and WIP checks against the current snapshot. Sends nothing.
    pub fn plan_move(&self, id: u64, direction: MoveDirection) -> Result<PendingMove, BoardError> {
        let task = self.find(id)?;
        let from = task.status;
        let to = match direction {
            MoveDirection::Back => from.prev(),
            MoveDirection::Forward => from.next(),
        };
        if to == from {
            return Err(BoardError::CannotMove {
                id,
                status: from.as_str(),
            });
        }
        wip::check_transition(&self.tasks, Some(from), to, self.max_in_progress)?;
        Ok(PendingMove {
            task_id: id,
            from,
            to,
        })
    }

    /// Sends a planned move. Moves into DONE carry the completion input;
    /// blank or missing fields keep the task's recorded comments and hours.
    pub fn commit_move(
        &mut self,
        pending: &PendingMove,
        completion: Option<&Completion>,
    ) -> Result<Task, BoardError> {
        let patch = if pending.needs_completion() {
            let recorded = self
                .find(pending.task_id)
                .map(Completion::for_task)
                .unwrap_or_default();
            completion.cloned().unwrap_or_default().or(recorded).validate()?
        } else {
            TaskPatch::status(pending.to)
        };

        let task = self.api.patch_task(pending.task_id, &patch)?;
        info!(id = task.id, from = %pending.from, to = %pending.to, "moved task");
        self.refresh_after_mutation(task.id);
        Ok(task)
    }

    /// The mutation already happened, so a failed reload only shows up as
    /// `load_error` on the board.
    fn refresh_after_mutation(&mut self, id: u64) {
        match self.refresh() {
            Ok(()) => self.select_id(id),
            Err(e) => warn!(id, "reload after change failed: {}", e),
        }
    }

    pub fn move_task(
        &mut self,
        id: u64,
        direction: MoveDirection,
        completion: Option<&Completion>,
    ) -> Result<Task, BoardError> {
        let pending = self.plan_move(id, direction)?;
        self.commit_move(&pending, completion)
    }

    pub fn move_selected(&self, direction: MoveDirection) -> Result<PendingMove, BoardError> {
        let id = self.selected().ok_or(BoardError::NoSelection)?.id;
        self.plan_move(id, direction)
    }

    pub fn set_max_in_progress(&mut self, value: i64) -> Result<Settings, BoardError> {
        let settings = Settings::new(value)?;
        self.save_settings(settings)
    }

    pub fn save_settings(&mut self, settings: Settings) -> Result<Settings, BoardError> {
        settings::validate_max_in_progress(i64::from(settings.max_in_progress))?;
        let saved = self.api.update_settings(&settings)?;
        info!(max_in_progress = saved.max_in_progress, "updated settings");
        if let Err(e) = self.refresh() {
            warn!("reload after settings change failed: {}", e);
        }
        Ok(saved)
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats {
            todo: self.get_tasks_by_status(TaskStatus::Todo).len(),
            in_progress: self.in_progress_count(),
            done: self.get_tasks_by_status(TaskStatus::Done).len(),
            max_in_progress: self.max_in_progress,
            estimated_hours: self.tasks.iter().map(Task::estimate).sum(),
            actual_hours: self.tasks.iter().filter_map(|t| t.actual_time).sum(),
        }
    }
}
