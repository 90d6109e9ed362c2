use std::time::Duration;

use mastery_core::model::LevelId;

/// Delays of the level controller's automatic transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTimings {
    /// After revealing a flashcard answer, before moving to the next card.
    pub flashcard_advance: Duration,
    /// After picking a single-answer option, before moving to the next question.
    pub question_advance: Duration,
    /// After the answers document is stored, before opening the final review.
    pub final_review: Duration,
}

impl Default for LevelTimings {
    fn default() -> Self {
        Self {
            flashcard_advance: Duration::from_millis(1500),
            question_advance: Duration::from_millis(300),
            final_review: Duration::from_millis(1500),
        }
    }
}

/// Work scheduled by the level controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTimer {
    /// Advance past the flashcard at `index` whose answer was revealed.
    FlashcardAdvance { index: usize },
    /// Move on from the single-answer question at `index`.
    QuestionAdvance { index: usize },
    /// Leave the upload phase for the final review.
    OpenFinalReview,
}

/// Side effects a fired transition asks the UI to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEffect {
    FocusFlashcards,
    FocusQuestions,
    FocusQuestion(usize),
    QuestionsCompleted,
    Navigate(LevelId),
}
