use mastery_core::model::{LevelId, ProgressState, QuestionId, QuestionType};
use services::LevelController;

use crate::vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarEntryVm {
    pub id: u8,
    pub title: &'static str,
    pub active: bool,
    pub locked: bool,
    pub is_final: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardVm {
    pub side_label: &'static str,
    pub text: String,
    pub position_label: String,
    pub show_answer: bool,
    pub can_go_back: bool,
    pub next_label: &'static str,
    pub offer_questions: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub index: usize,
    pub kind: QuestionType,
    pub text: String,
    pub concept_focus: String,
    pub instruction: &'static str,
    pub answered: bool,
    pub locked: bool,
    pub options: Vec<OptionVm>,
}

/// Render-ready snapshot of a [`LevelController`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelVm {
    pub level_id: LevelId,
    pub has_level: bool,
    pub title: String,
    pub level_badge: String,
    pub loading: bool,
    pub submitting: bool,
    pub progress: ProgressState,
    pub feedback_html: Option<String>,
    pub feedback_badge: Option<String>,
    pub reading_html: String,
    pub show_continue: bool,
    pub flashcard: Option<FlashcardVm>,
    pub questions: Vec<QuestionVm>,
    pub show_questions: bool,
    pub completion_status: String,
    pub show_submit: bool,
    pub can_submit: bool,
    pub show_final_upload: bool,
    pub sidebar: Vec<SidebarEntryVm>,
}

fn map_flashcard(controller: &LevelController) -> Option<FlashcardVm> {
    if !controller.progress().shows_flashcards() {
        return None;
    }
    let card = controller.current_flashcard()?;
    let index = controller.flashcard_index();
    let count = controller.flashcard_count();
    let show_answer = controller.show_answer();
    let is_last = index + 1 == count;
    Some(FlashcardVm {
        side_label: if show_answer { "Answer:" } else { "Question:" },
        text: if show_answer {
            card.content.clone()
        } else {
            card.heading.clone()
        },
        position_label: format!("{} of {count}", index + 1),
        show_answer,
        can_go_back: index > 0,
        next_label: if is_last {
            "Continue to Questions"
        } else {
            "Next"
        },
        offer_questions: is_last
            && show_answer
            && controller.progress() == ProgressState::Flashcards,
    })
}

fn map_questions(controller: &LevelController) -> Vec<QuestionVm> {
    let answers = controller.answers();
    controller
        .questions()
        .iter()
        .enumerate()
        .filter(|(index, _)| controller.is_revealed(*index))
        .map(|(index, question)| QuestionVm {
            id: question.id.clone(),
            index,
            kind: question.kind,
            text: question.question_text.clone(),
            concept_focus: question.concept_focus.clone(),
            instruction: question.kind.instruction(),
            answered: !answers.selections(&question.id).is_empty(),
            locked: controller.is_option_locked(index),
            options: question
                .options
                .iter()
                .map(|option| OptionVm {
                    label: option.clone(),
                    selected: answers.is_selected(&question.id, option),
                })
                .collect(),
        })
        .collect()
}

#[must_use]
pub fn map_level_vm(controller: &LevelController) -> LevelVm {
    let level_id = controller.level_id();
    let progress = controller.progress();
    let level = controller.level();

    let feedback_html = level
        .and_then(|data| data.feedback_md.as_deref())
        .filter(|md| !md.trim().is_empty())
        .map(markdown_to_html);
    let feedback_badge = (feedback_html.is_some() && !level_id.is_overview())
        .then(|| format!("Level {} Feedback", level_id.value() - 1));

    let show_questions = progress.shows_questions() && !controller.questions().is_empty();

    LevelVm {
        level_id,
        has_level: level.is_some(),
        title: controller.title(),
        level_badge: format!("Level {level_id}"),
        loading: controller.is_loading(),
        submitting: controller.is_submitting(),
        progress,
        feedback_html,
        feedback_badge,
        reading_html: level
            .map(|data| markdown_to_html(data.reading_markdown(level_id)))
            .unwrap_or_default(),
        show_continue: level.is_some() && progress == ProgressState::Reading,
        flashcard: map_flashcard(controller),
        questions: if show_questions {
            map_questions(controller)
        } else {
            Vec::new()
        },
        show_questions,
        completion_status: controller.completion_status(),
        show_submit: progress == ProgressState::Completed,
        can_submit: controller.can_submit(),
        show_final_upload: level_id == LevelId::MASTERY
            && matches!(progress, ProgressState::Completed | ProgressState::Upload),
        sidebar: controller
            .level_entries()
            .into_iter()
            .map(|entry| SidebarEntryVm {
                id: entry.id.value(),
                title: entry.title,
                active: entry.active,
                locked: entry.locked,
                is_final: entry.id == LevelId::FINAL_REVIEW,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mastery_core::model::{
        AnsweredQuestions, AssessmentQuestion, FileRef, Flashcard, LevelData, LevelStatus,
    };
    use services::{ContentService, ContentServiceError, PriorSubmission};
    use storage::InMemorySessionStore;

    use super::*;

    struct OneLevel(LevelData);

    #[async_trait]
    impl ContentService for OneLevel {
        async fn fetch_level(
            &self,
            _level_id: LevelId,
            _uploaded_files: &[FileRef],
            _prior: Option<&PriorSubmission>,
        ) -> Result<LevelData, ContentServiceError> {
            Ok(self.0.clone())
        }

        async fn submit_answers(
            &self,
            _level_id: LevelId,
            _questions: &[AssessmentQuestion],
            _answers: &AnsweredQuestions,
            _uploaded_files: &[FileRef],
        ) -> Result<(), ContentServiceError> {
            Ok(())
        }
    }

    async fn loaded(level_id: u8, data: LevelData) -> LevelController {
        let mut controller = LevelController::new(
            Arc::new(OneLevel(data)),
            Arc::new(InMemorySessionStore::new()),
        );
        controller
            .load_level(LevelId::new(level_id).unwrap())
            .await
            .unwrap();
        controller
    }

    fn sample(questions: Vec<AssessmentQuestion>) -> LevelData {
        LevelData::new(
            LevelStatus::PracticalApplication,
            "# Apply it",
            vec![Flashcard::new("Term", "Meaning"), Flashcard::new("Other", "More")],
            questions,
        )
        .with_feedback("**Nice** work")
    }

    #[test]
    fn empty_controller_maps_to_placeholder() {
        let controller = LevelController::new(
            Arc::new(OneLevel(sample(vec![]))),
            Arc::new(InMemorySessionStore::new()),
        );
        let vm = map_level_vm(&controller);
        assert!(!vm.has_level);
        assert!(!vm.show_continue);
        assert_eq!(vm.title, "Assignment Overview");
        assert_eq!(vm.sidebar.len(), 7);
    }

    #[tokio::test]
    async fn reading_phase_shows_content_and_feedback() {
        let controller = loaded(3, sample(vec![])).await;
        let vm = map_level_vm(&controller);
        assert_eq!(vm.title, "Practical Application");
        assert_eq!(vm.level_badge, "Level 3");
        assert!(vm.reading_html.contains("<h1>Apply it</h1>"));
        assert!(vm.feedback_html.unwrap().contains("<strong>Nice</strong>"));
        assert_eq!(vm.feedback_badge.as_deref(), Some("Level 2 Feedback"));
        assert!(vm.show_continue);
        assert!(vm.flashcard.is_none());
        assert!(!vm.show_questions);
    }

    #[tokio::test]
    async fn flashcard_side_follows_reveal() {
        let mut controller = loaded(1, sample(vec![])).await;
        controller.continue_to_flashcards().unwrap();
        let card = map_level_vm(&controller).flashcard.unwrap();
        assert_eq!(card.side_label, "Question:");
        assert_eq!(card.text, "Term");
        assert_eq!(card.position_label, "1 of 2");
        assert!(!card.can_go_back);
        assert_eq!(card.next_label, "Next");

        let _advance = controller.reveal_answer().unwrap();
        let card = map_level_vm(&controller).flashcard.unwrap();
        assert_eq!(card.side_label, "Answer:");
        assert_eq!(card.text, "Meaning");
    }

    #[tokio::test]
    async fn only_revealed_questions_are_listed() {
        let questions = vec![
            AssessmentQuestion::new("q1", QuestionType::Mcq, "First?", ["A", "B"]),
            AssessmentQuestion::new("q2", QuestionType::Mcq, "Second?", ["A", "B"]),
        ];
        let mut controller = loaded(1, sample(questions)).await;
        controller.continue_to_flashcards().unwrap();
        controller.next_flashcard().unwrap();
        controller.next_flashcard().unwrap();

        let vm = map_level_vm(&controller);
        assert!(vm.show_questions);
        assert_eq!(vm.questions.len(), 1);
        assert_eq!(vm.completion_status, "0/2");

        controller
            .record_answer(&QuestionId::from("q1"), "B", 0, QuestionType::Mcq)
            .unwrap();
        let vm = map_level_vm(&controller);
        assert_eq!(vm.questions.len(), 2);
        assert!(vm.questions[0].locked);
        assert!(vm.questions[0].options[1].selected);
        assert_eq!(vm.questions[1].instruction, "Select one answer");
    }
}
