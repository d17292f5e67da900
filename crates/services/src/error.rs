//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ClientSessionError, ClientSettingsError};
use storage::repository::StorageError;

/// Errors from the exam backend collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not signed in or not allowed to access this paper")]
    Unauthorized,
    #[error("paper not found")]
    NotFound,
    #[error("exam API request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("exam API returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid exam API URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the attempt controller and its orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("no paper selected")]
    MissingPaperId,
    #[error("could not load paper")]
    Fetch(#[source] ApiError),
    #[error("this paper has no questions")]
    EmptyPaper,
    #[error("could not submit answers")]
    Submit(#[source] ApiError),
    #[error("a submission is already in progress")]
    Submitting,
    #[error("attempt is paused")]
    Paused,
    #[error("attempt already submitted")]
    Finished,
    #[error("question index {index} out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },
    #[error("unknown option label: {label}")]
    UnknownOption { label: String },
}

/// Errors emitted by `ClientSessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientSessionServiceError {
    #[error(transparent)]
    Session(#[from] ClientSessionError),
    #[error(transparent)]
    Settings(#[from] ClientSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
