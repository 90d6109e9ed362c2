//! Shared error types for the services crate.

use thiserror::Error;

use mastery_core::model::QuestionId;
use storage::repository::StorageError;

use crate::notice::Notice;
use crate::wizard::WizardStep;

/// Errors emitted by `ContentService` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentServiceError {
    #[error("content service is not configured")]
    Disabled,
    #[error("invalid content service url: {0}")]
    InvalidUrl(String),
    #[error("content service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("content service returned an unreadable body: {0}")]
    Decode(String),
    #[error("content service unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `LevelController`.
///
/// None of them is fatal: the controller state is left as it was and the
/// triggering action may simply be retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LevelError {
    #[error("failed to load level content: {0}")]
    Fetch(#[source] ContentServiceError),
    #[error("failed to submit answers: {0}")]
    Submit(#[source] ContentServiceError),
    #[error("stored files are malformed: {0}")]
    StorageParse(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("a request is already in flight")]
    Busy,
    #[error("response belongs to a superseded request")]
    Stale,
    #[error("no level is loaded")]
    NoLevel,
    #[error("every question needs an answer before submitting")]
    NotCompleted,
    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),
    #[error("option {option:?} is not offered by question {question}")]
    UnknownOption { question: QuestionId, option: String },
    #[error("action not available: {0}")]
    InvalidState(&'static str),
}

impl LevelError {
    /// Map a session-store failure while reading the uploaded files.
    pub(crate) fn from_files_read(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(msg) => LevelError::StorageParse(msg),
            other => LevelError::Storage(other),
        }
    }

    /// User-facing notification for this error, if it warrants one.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            LevelError::Fetch(_) => Some(Notice::error(
                "Error loading content",
                "Failed to load level content. Please try again.",
            )),
            LevelError::Submit(_) => Some(Notice::error(
                "Error submitting answers",
                "Failed to submit your answers. Please try again.",
            )),
            LevelError::StorageParse(_) => Some(Notice::error(
                "Error loading files",
                "There was a problem loading your uploaded files. You may need to upload them again.",
            )),
            LevelError::Storage(_) => Some(Notice::error(
                "Error processing document",
                "There was a problem processing your answers document. Please try again.",
            )),
            LevelError::Busy
            | LevelError::Stale
            | LevelError::NoLevel
            | LevelError::NotCompleted
            | LevelError::UnknownQuestion(_)
            | LevelError::UnknownOption { .. }
            | LevelError::InvalidState(_) => None,
        }
    }
}

/// Errors emitted by `WizardController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WizardError {
    #[error("expected step {expected:?}, wizard is at {actual:?}")]
    OutOfSequence {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("cannot go back from {0:?}")]
    BackNotAllowed(WizardStep),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
