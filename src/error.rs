use std::path::PathBuf;

use thiserror::Error;

/// Input rejected before anything is sent to the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Title must not be empty.")]
    EmptyTitle,

    #[error("Title is too long ({len} chars, max. {max}).")]
    TitleTooLong { max: usize, len: usize },

    #[error("Description is too long ({len} chars, max. {max}).")]
    DescriptionTooLong { max: usize, len: usize },

    #[error("The {field} must be a number, got '{value}'.")]
    InvalidNumber { field: &'static str, value: String },

    #[error("The {field} cannot be negative.")]
    NegativeHours { field: &'static str },

    #[error("A responsible must be selected.")]
    MissingResponsible,

    #[error("Unknown responsible '{0}'.")]
    UnknownResponsible(String),

    #[error("Unknown status '{0}', expected TODO, IN_PROGRESS or DONE.")]
    UnknownStatus(String),

    #[error("The IN_PROGRESS limit must be between {min} and {max}, got {value}.")]
    LimitOutOfRange { min: i64, max: i64, value: i64 },

    #[error("The IN_PROGRESS limit must be a whole number, got '{0}'.")]
    InvalidLimit(String),
}

/// Failure talking to the backend. The `Display` form is what the user sees.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Only {limit} tasks may be IN_PROGRESS at the same time.")]
    WipLimitReached { limit: u32 },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("No task selected.")]
    NoSelection,

    #[error("Task #{id} not found.")]
    UnknownTask { id: u64 },

    #[error("Task #{id} is already {status} and cannot move further.")]
    CannotMove { id: u64, status: &'static str },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}
