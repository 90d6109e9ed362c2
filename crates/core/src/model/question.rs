use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// Answer cardinality of an assessment question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Exactly one option.
    #[serde(rename = "MCQ")]
    Mcq,
    /// Zero or more options.
    #[serde(rename = "MAQ")]
    Maq,
}

impl QuestionType {
    /// Hint shown next to the question.
    #[must_use]
    pub fn instruction(self) -> &'static str {
        match self {
            QuestionType::Mcq => "Select one answer",
            QuestionType::Maq => "Select all that apply",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: QuestionId,
    pub question_text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub concept_focus: String,
    pub options: Vec<String>,
}

impl AssessmentQuestion {
    #[must_use]
    pub fn new(
        id: impl Into<QuestionId>,
        kind: QuestionType,
        question_text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            kind,
            concept_focus: String::new(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_concept_focus(mut self, focus: impl Into<String>) -> Self {
        self.concept_focus = focus.into();
        self
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}
