use serde::{Deserialize, Serialize};

use crate::model::flashcard::Flashcard;
use crate::model::ids::LevelId;
use crate::model::question::AssessmentQuestion;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Stage name reported by the content service for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelStatus {
    #[serde(rename = "LEVEL_0_OVERVIEW")]
    Overview,
    #[serde(rename = "LEVEL_1_BASIC_UNDERSTANDING")]
    BasicUnderstanding,
    #[serde(rename = "LEVEL_2_ADVANCED_UNDERSTANDING")]
    AdvancedUnderstanding,
    #[serde(rename = "LEVEL_3_PRACTICAL_APPLICATION")]
    PracticalApplication,
    #[serde(rename = "LEVEL_4_EXPERT_IMPLEMENTATION")]
    ExpertImplementation,
    #[serde(rename = "LEVEL_5_MASTERY")]
    Mastery,
    #[serde(rename = "LEVEL_6_FINAL_REVIEW")]
    FinalReview,
    #[serde(other)]
    Unknown,
}

impl LevelStatus {
    #[must_use]
    pub fn title(self) -> Option<&'static str> {
        match self {
            LevelStatus::Overview => Some("Assignment Overview"),
            LevelStatus::BasicUnderstanding => Some("Basic Understanding"),
            LevelStatus::AdvancedUnderstanding => Some("Advanced Understanding"),
            LevelStatus::PracticalApplication => Some("Practical Application"),
            LevelStatus::ExpertImplementation => Some("Expert Implementation"),
            LevelStatus::Mastery => Some("Mastery"),
            LevelStatus::FinalReview => Some("Final Review"),
            LevelStatus::Unknown => None,
        }
    }
}

/// Sidebar title for a level id.
#[must_use]
pub fn level_title(id: LevelId) -> &'static str {
    match id.value() {
        0 => "Assignment Overview",
        1 => "Basic Understanding",
        2 => "Advanced Understanding",
        3 => "Practical Application",
        4 => "Expert Implementation",
        5 => "Mastery",
        _ => "Final Review",
    }
}

//
// ─── LEVEL DATA ────────────────────────────────────────────────────────────────
//

/// Which wire key supplied the main content.
///
/// The service sometimes sends `main_conent_md`; both are accepted and the
/// source is kept so callers can report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MainContentSource {
    Canonical,
    Misspelled,
    #[default]
    Missing,
}

/// One fetched level. Replaced wholesale whenever another level is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LevelDataWire", into = "LevelDataWire")]
pub struct LevelData {
    pub status: LevelStatus,
    pub assignment_summary_md: Option<String>,
    pub main_content_md: String,
    pub main_content_source: MainContentSource,
    pub feedback_md: Option<String>,
    pub flashcards: Vec<Flashcard>,
    pub assessment_questions: Vec<AssessmentQuestion>,
}

impl LevelData {
    #[must_use]
    pub fn new(
        status: LevelStatus,
        main_content_md: impl Into<String>,
        flashcards: Vec<Flashcard>,
        assessment_questions: Vec<AssessmentQuestion>,
    ) -> Self {
        Self {
            status,
            assignment_summary_md: None,
            main_content_md: main_content_md.into(),
            main_content_source: MainContentSource::Canonical,
            feedback_md: None,
            flashcards,
            assessment_questions,
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback_md = Some(feedback.into());
        self
    }

    #[must_use]
    pub fn with_assignment_summary(mut self, summary: impl Into<String>) -> Self {
        self.assignment_summary_md = Some(summary.into());
        self
    }

    /// Title from the status, falling back to `Level {id}`.
    #[must_use]
    pub fn title(&self, id: LevelId) -> String {
        self.status
            .title()
            .map_or_else(|| format!("Level {id}"), str::to_owned)
    }

    /// Markdown for the reading phase. The overview prefers the assignment summary.
    #[must_use]
    pub fn reading_markdown(&self, id: LevelId) -> &str {
        match self.assignment_summary_md.as_deref() {
            Some(summary) if id.is_overview() && !summary.trim().is_empty() => summary,
            _ => &self.main_content_md,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct LevelDataWire {
    status: LevelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignment_summary_md: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    main_content_md: Option<String>,
    #[serde(default, skip_serializing)]
    main_conent_md: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feedback_md: Option<String>,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
    #[serde(default)]
    assessment_questions: Vec<AssessmentQuestion>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<LevelDataWire> for LevelData {
    fn from(wire: LevelDataWire) -> Self {
        let (main_content_md, main_content_source) = match (
            non_empty(wire.main_content_md),
            non_empty(wire.main_conent_md),
        ) {
            (Some(content), _) => (content, MainContentSource::Canonical),
            (None, Some(content)) => (content, MainContentSource::Misspelled),
            (None, None) => (String::new(), MainContentSource::Missing),
        };
        Self {
            status: wire.status,
            assignment_summary_md: wire.assignment_summary_md,
            main_content_md,
            main_content_source,
            feedback_md: wire.feedback_md,
            flashcards: wire.flashcards,
            assessment_questions: wire.assessment_questions,
        }
    }
}

impl From<LevelData> for LevelDataWire {
    fn from(level: LevelData) -> Self {
        Self {
            status: level.status,
            assignment_summary_md: level.assignment_summary_md,
            main_content_md: Some(level.main_content_md),
            main_conent_md: None,
            feedback_md: level.feedback_md,
            flashcards: level.flashcards,
            assessment_questions: level.assessment_questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_misspelled_main_content_key() {
        let json = r#"{"status": "LEVEL_2_ADVANCED_UNDERSTANDING", "main_conent_md": "body"}"#;
        let level: LevelData = serde_json::from_str(json).unwrap();
        assert_eq!(level.main_content_md, "body");
        assert_eq!(level.main_content_source, MainContentSource::Misspelled);
        assert!(level.flashcards.is_empty());
    }

    #[test]
    fn canonical_key_wins_over_misspelling() {
        let json = r#"{
            "status": "LEVEL_1_BASIC_UNDERSTANDING",
            "main_content_md": "right",
            "main_conent_md": "wrong"
        }"#;
        let level: LevelData = serde_json::from_str(json).unwrap();
        assert_eq!(level.main_content_md, "right");
        assert_eq!(level.main_content_source, MainContentSource::Canonical);
    }

    #[test]
    fn missing_content_is_empty() {
        let level: LevelData = serde_json::from_str(r#"{"status": "LEVEL_5_MASTERY"}"#).unwrap();
        assert_eq!(level.main_content_md, "");
        assert_eq!(level.main_content_source, MainContentSource::Missing);
    }

    #[test]
    fn unknown_status_falls_back_to_level_number() {
        let level: LevelData = serde_json::from_str(r#"{"status": "SOMETHING_NEW"}"#).unwrap();
        assert_eq!(level.status, LevelStatus::Unknown);
        assert_eq!(level.title(LevelId::new(3).unwrap()), "Level 3");
    }

    #[test]
    fn overview_reads_assignment_summary_first() {
        let level = LevelData::new(LevelStatus::Overview, "main", vec![], vec![])
            .with_assignment_summary("summary");
        assert_eq!(level.reading_markdown(LevelId::OVERVIEW), "summary");
        assert_eq!(level.reading_markdown(LevelId::MASTERY), "main");
    }
}
