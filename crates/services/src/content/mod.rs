mod http;

use async_trait::async_trait;
use serde::Serialize;

use mastery_core::model::{AnsweredQuestions, AssessmentQuestion, FileRef, LevelData, LevelId};

use crate::error::ContentServiceError;

pub use http::{ContentServiceConfig, HttpContentService};

/// Questions and answers of the level being left, sent along when fetching the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorSubmission {
    pub questions: Vec<AssessmentQuestion>,
    pub answers: AnsweredQuestions,
}

/// External generator of level content and assessor of answers.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Fetch the content of `level_id`.
    ///
    /// # Errors
    ///
    /// Returns `ContentServiceError` on transport or server failure.
    async fn fetch_level(
        &self,
        level_id: LevelId,
        uploaded_files: &[FileRef],
        prior: Option<&PriorSubmission>,
    ) -> Result<LevelData, ContentServiceError>;

    /// Submit the answers given for `level_id`.
    ///
    /// # Errors
    ///
    /// Returns `ContentServiceError` on transport or server failure.
    async fn submit_answers(
        &self,
        level_id: LevelId,
        questions: &[AssessmentQuestion],
        answers: &AnsweredQuestions,
        uploaded_files: &[FileRef],
    ) -> Result<(), ContentServiceError>;
}
