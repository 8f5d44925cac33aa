use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

pub const TITLE_MAX_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 280;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Column order on the board.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    pub const fn column(self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }

    /// DONE stays DONE.
    pub const fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress | TaskStatus::Done => TaskStatus::Done,
        }
    }

    /// TODO stays TODO.
    pub const fn prev(self) -> TaskStatus {
        match self {
            TaskStatus::Done => TaskStatus::InProgress,
            TaskStatus::InProgress | TaskStatus::Todo => TaskStatus::Todo,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" | "DOING" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(ValidationError::UnknownStatus(value.to_owned())),
        }
    }
}

/// A task as returned by the backend. Only `id` and `title` are guaranteed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, alias = "estimatedTime")]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub actual_time: Option<f64>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
}

impl Task {
    pub fn estimate(&self) -> f64 {
        self.estimated_time.unwrap_or(0.0)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    #[cfg(test)]
    pub fn sample(id: u64, status: TaskStatus) -> Self {
        Self {
            id,
            title: format!("task {id}"),
            description: None,
            status,
            estimated_time: None,
            actual_time: None,
            comments: None,
            responsible: None,
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
}

/// Raw user input for a new task, before validation.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub estimate: String,
    pub status: TaskStatus,
    pub responsible: Option<String>,
}

impl TaskDraft {
    /// Checks the input rules and builds the request body.
    ///
    /// `responsibles` is the list published by the backend; when it is
    /// non-empty a responsible from that list is mandatory.
    pub fn validate(&self, responsibles: &[String]) -> Result<NewTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let title_len = title.chars().count();
        if title_len > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                len: title_len,
            });
        }

        let description = self.description.trim();
        let description_len = description.chars().count();
        if description_len > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX_CHARS,
                len: description_len,
            });
        }

        let estimated_time = parse_hours(&self.estimate, "estimated time")?;

        let responsible = self
            .responsible
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        if !responsibles.is_empty() {
            match responsible {
                None => return Err(ValidationError::MissingResponsible),
                Some(name) if !responsibles.iter().any(|r| r == name) => {
                    return Err(ValidationError::UnknownResponsible(name.to_owned()));
                }
                Some(_) => {}
            }
        }

        Ok(NewTask {
            title: title.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
            estimated_time,
            status: Some(self.status),
            responsible: responsible.map(str::to_owned),
        })
    }
}

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<f64>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn complete(comments: String, actual_time: f64) -> Self {
        Self {
            status: Some(TaskStatus::Done),
            comments: Some(comments),
            actual_time: Some(actual_time),
        }
    }
}

/// Completion input collected when a task moves into DONE.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub comments: String,
    pub actual_time: String,
}

impl Completion {
    /// Prefills the form from what the task already carries.
    pub fn for_task(task: &Task) -> Self {
        Self {
            comments: task.comments.clone().unwrap_or_default(),
            actual_time: format_hours(task.actual_time.unwrap_or(0.0)),
        }
    }

    /// Blank fields fall back to `base`.
    pub fn or(&self, base: Completion) -> Completion {
        let pick = |given: &str, fallback: String| {
            if given.trim().is_empty() {
                fallback
            } else {
                given.to_owned()
            }
        };
        Completion {
            comments: pick(&self.comments, base.comments),
            actual_time: pick(&self.actual_time, base.actual_time),
        }
    }

    pub fn validate(&self) -> Result<TaskPatch, ValidationError> {
        let actual_time = parse_hours(&self.actual_time, "actual time")?.unwrap_or(0.0);
        Ok(TaskPatch::complete(
            self.comments.trim().to_owned(),
            actual_time,
        ))
    }
}

/// Parses an hours field. Blank input means "not given".
pub fn parse_hours(raw: &str, field: &'static str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let hours: f64 = raw
        .parse()
        .ok()
        .filter(|h: &f64| h.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })?;
    if hours < 0.0 {
        return Err(ValidationError::NegativeHours { field });
    }
    Ok(Some(hours))
}

pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}")
    } else {
        format!("{hours}")
    }
}
