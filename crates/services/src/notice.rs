/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Info,
    Error,
}

/// A toast-style message raised by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
    pub tone: NoticeTone,
}

impl Notice {
    #[must_use]
    pub const fn info(title: &'static str, description: &'static str) -> Self {
        Self {
            title,
            description,
            tone: NoticeTone::Info,
        }
    }

    #[must_use]
    pub const fn error(title: &'static str, description: &'static str) -> Self {
        Self {
            title,
            description,
            tone: NoticeTone::Error,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.tone == NoticeTone::Error
    }
}

pub const SUBMITTING_ANSWERS: Notice = Notice::info(
    "Submitting answers",
    "Analyzing your answers and generating next level content...",
);

pub const ANSWERS_DOCUMENT_UPLOADED: Notice = Notice::info(
    "Answers document uploaded",
    "Your answers will be reviewed and feedback will be provided in the Final Review.",
);

pub const LEARNING_SESSION_COMPLETED: Notice = Notice::info(
    "Learning session completed!",
    "You've successfully completed this guided learning session.",
);
