mod answers;
mod files;
mod flashcard;
mod ids;
mod level;
mod progress;
mod question;

pub use answers::AnsweredQuestions;
pub use files::FileRef;
pub use flashcard::Flashcard;
pub use ids::{AssistanceLevel, CourseId, LevelId, QuestionId};
pub use level::{LevelData, LevelStatus, MainContentSource, level_title};
pub use progress::ProgressState;
pub use question::{AssessmentQuestion, QuestionType};
