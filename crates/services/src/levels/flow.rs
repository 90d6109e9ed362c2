//! Detached halves of the controller's network requests.
//!
//! A ticket owns everything its request needs, so it can run on a spawned task
//! while the controller stays free for other events.

use std::sync::Arc;

use mastery_core::model::{AnsweredQuestions, AssessmentQuestion, FileRef, LevelData, LevelId};
use storage::{load_uploaded_files, save_answers_document};
use storage::repository::SessionStore;

use crate::content::{ContentService, PriorSubmission};
use crate::error::{ContentServiceError, LevelError};

/// Result of a successful [`finish_load`](super::LevelController::finish_load).
#[derive(Debug)]
pub struct LoadReport {
    pub level_id: LevelId,
    /// Non-fatal problem met while resolving the uploaded files.
    pub warning: Option<LevelError>,
}

/// A level fetch ready to run.
pub struct LoadTicket {
    seq: u64,
    level_id: LevelId,
    files: Vec<FileRef>,
    prior: Option<PriorSubmission>,
    content: Arc<dyn ContentService>,
    store: Arc<dyn SessionStore>,
}

/// What a [`LoadTicket`] brought back.
#[derive(Debug)]
pub struct LoadOutcome {
    pub(crate) seq: u64,
    pub(crate) level_id: LevelId,
    pub(crate) files: Vec<FileRef>,
    pub(crate) warning: Option<LevelError>,
    pub(crate) result: Result<LevelData, ContentServiceError>,
}

impl LoadTicket {
    pub(crate) fn new(
        seq: u64,
        level_id: LevelId,
        files: Vec<FileRef>,
        prior: Option<PriorSubmission>,
        content: Arc<dyn ContentService>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            seq,
            level_id,
            files,
            prior,
            content,
            store,
        }
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    pub async fn execute(self) -> LoadOutcome {
        let (files, warning) = resolve_files(self.files, self.store.as_ref()).await;
        let result = self
            .content
            .fetch_level(self.level_id, &files, self.prior.as_ref())
            .await;
        LoadOutcome {
            seq: self.seq,
            level_id: self.level_id,
            files,
            warning,
            result,
        }
    }
}

impl LoadOutcome {
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// An answer submission ready to run.
pub struct SubmitTicket {
    seq: u64,
    level_id: LevelId,
    questions: Vec<AssessmentQuestion>,
    answers: AnsweredQuestions,
    files: Vec<FileRef>,
    content: Arc<dyn ContentService>,
    store: Arc<dyn SessionStore>,
}

/// What a [`SubmitTicket`] brought back.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub(crate) seq: u64,
    pub(crate) level_id: LevelId,
    pub(crate) files: Vec<FileRef>,
    pub(crate) result: Result<(), ContentServiceError>,
}

impl SubmitTicket {
    pub(crate) fn new(
        seq: u64,
        level_id: LevelId,
        questions: Vec<AssessmentQuestion>,
        answers: AnsweredQuestions,
        files: Vec<FileRef>,
        content: Arc<dyn ContentService>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            seq,
            level_id,
            questions,
            answers,
            files,
            content,
            store,
        }
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    pub async fn execute(self) -> SubmitOutcome {
        // A broken payload only costs the submission its files.
        let (files, _) = resolve_files(self.files, self.store.as_ref()).await;
        let result = self
            .content
            .submit_answers(self.level_id, &self.questions, &self.answers, &files)
            .await;
        SubmitOutcome {
            seq: self.seq,
            level_id: self.level_id,
            files,
            result,
        }
    }
}

impl SubmitOutcome {
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }
}

/// A pending write of the mastery level's answers document.
pub struct AnswersUpload {
    document: FileRef,
    store: Arc<dyn SessionStore>,
}

impl AnswersUpload {
    pub(crate) fn new(document: FileRef, store: Arc<dyn SessionStore>) -> Self {
        Self { document, store }
    }

    #[must_use]
    pub fn document(&self) -> &FileRef {
        &self.document
    }

    /// # Errors
    ///
    /// Returns `LevelError::Storage` if the session store rejects the write.
    pub async fn execute(self) -> Result<(), LevelError> {
        save_answers_document(self.store.as_ref(), &self.document)
            .await
            .map_err(|err| {
                tracing::warn!(%err, name = %self.document.name, "answers document not stored");
                LevelError::Storage(err)
            })?;
        tracing::info!(name = %self.document.name, "answers document stored");
        Ok(())
    }
}

/// Use the files already in hand, else whatever the upload wizard stored.
async fn resolve_files(
    files: Vec<FileRef>,
    store: &dyn SessionStore,
) -> (Vec<FileRef>, Option<LevelError>) {
    if !files.is_empty() {
        return (files, None);
    }
    match load_uploaded_files(store).await {
        Ok(Some(stored)) => (stored, None),
        Ok(None) => (Vec::new(), None),
        Err(err) => {
            tracing::warn!(%err, "could not read uploaded files from session");
            (Vec::new(), Some(LevelError::from_files_read(err)))
        }
    }
}
