use serde::{Deserialize, Serialize};

/// Sub-phase of a level session.
///
/// Moves forward only; flashcard back-navigation touches the cursor, never this value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    #[default]
    Reading,
    Flashcards,
    Questions,
    Completed,
    Upload,
}

impl ProgressState {
    /// Whether the flashcard deck is visible in this phase.
    #[must_use]
    pub fn shows_flashcards(self) -> bool {
        !matches!(self, ProgressState::Reading)
    }

    /// Whether the assessment questions are visible in this phase.
    #[must_use]
    pub fn shows_questions(self) -> bool {
        matches!(
            self,
            ProgressState::Questions | ProgressState::Completed | ProgressState::Upload
        )
    }
}
