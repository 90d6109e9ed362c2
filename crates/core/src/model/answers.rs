use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::QuestionId;
use crate::model::question::{AssessmentQuestion, QuestionType};

/// Selections made so far in the current level, keyed by question id.
///
/// Each entry keeps its options in selection order. An entry that exists with no
/// options is a touched multiple-answer question, which still counts as answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnsweredQuestions(BTreeMap<QuestionId, Vec<String>>);

impl AnsweredQuestions {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Replace the selection for `id` with the single `option`.
    pub fn select_single(&mut self, id: &QuestionId, option: &str) {
        self.0.insert(id.clone(), vec![option.to_owned()]);
    }

    /// Add `option` to the selection for `id`, or remove it if already selected.
    ///
    /// Removing the last option keeps the (now empty) entry.
    pub fn toggle(&mut self, id: &QuestionId, option: &str) {
        let selected = self.0.entry(id.clone()).or_default();
        if let Some(pos) = selected.iter().position(|o| o == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_owned());
        }
    }

    /// Apply the recording rule that matches `kind`.
    pub fn record(&mut self, id: &QuestionId, option: &str, kind: QuestionType) {
        match kind {
            QuestionType::Mcq => self.select_single(id, option),
            QuestionType::Maq => self.toggle(id, option),
        }
    }

    #[must_use]
    pub fn selections(&self, id: &QuestionId) -> &[String] {
        self.0.get(id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_selected(&self, id: &QuestionId, option: &str) -> bool {
        self.selections(id).iter().any(|o| o == option)
    }

    /// Whether the question has an entry at all, even an empty one.
    #[must_use]
    pub fn is_touched(&self, id: &QuestionId) -> bool {
        self.0.contains_key(id)
    }

    /// Single-answer questions need a selection; multiple-answer ones only need an entry.
    #[must_use]
    pub fn is_answered(&self, question: &AssessmentQuestion) -> bool {
        match question.kind {
            QuestionType::Mcq => !self.selections(&question.id).is_empty(),
            QuestionType::Maq => self.is_touched(&question.id),
        }
    }

    /// Count entries that belong to `questions` and qualify as answered.
    #[must_use]
    pub fn answered_count(&self, questions: &[AssessmentQuestion]) -> usize {
        self.0
            .keys()
            .filter(|id| {
                questions
                    .iter()
                    .find(|q| &q.id == *id)
                    .is_some_and(|q| self.is_answered(q))
            })
            .count()
    }

    #[must_use]
    pub fn all_answered(&self, questions: &[AssessmentQuestion]) -> bool {
        self.answered_count(questions) == questions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &[String])> {
        self.0.iter().map(|(id, options)| (id, options.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(id: &str) -> AssessmentQuestion {
        AssessmentQuestion::new(id, QuestionType::Mcq, "pick one", ["A", "B", "C"])
    }

    fn maq(id: &str) -> AssessmentQuestion {
        AssessmentQuestion::new(id, QuestionType::Maq, "pick any", ["A", "B", "C"])
    }

    #[test]
    fn select_single_is_idempotent() {
        let q = QuestionId::from("q1");
        let mut once = AnsweredQuestions::new();
        once.select_single(&q, "A");
        let mut twice = once.clone();
        twice.select_single(&q, "A");
        assert_eq!(once, twice);
        assert_eq!(twice.selections(&q), ["A".to_string()]);
    }

    #[test]
    fn select_single_replaces_previous_choice() {
        let q = QuestionId::from("q1");
        let mut answers = AnsweredQuestions::new();
        answers.select_single(&q, "A");
        answers.select_single(&q, "B");
        assert_eq!(answers.selections(&q), ["B".to_string()]);
    }

    #[test]
    fn toggle_twice_restores_previous_set() {
        let q = QuestionId::from("q1");
        let mut answers = AnsweredQuestions::new();
        answers.toggle(&q, "A");
        let before = answers.clone();

        answers.toggle(&q, "C");
        assert_eq!(answers.selections(&q), ["A".to_string(), "C".to_string()]);
        answers.toggle(&q, "C");
        assert_eq!(answers, before);
    }

    #[test]
    fn toggling_last_option_off_keeps_entry() {
        let q = QuestionId::from("q1");
        let mut answers = AnsweredQuestions::new();
        answers.toggle(&q, "A");
        answers.toggle(&q, "A");
        assert!(answers.is_touched(&q));
        assert!(answers.selections(&q).is_empty());
    }

    #[test]
    fn empty_maq_entry_counts_but_untouched_does_not() {
        let questions = vec![mcq("q1"), maq("q2")];
        let mut answers = AnsweredQuestions::new();
        assert_eq!(answers.answered_count(&questions), 0);

        answers.toggle(&QuestionId::from("q2"), "A");
        answers.toggle(&QuestionId::from("q2"), "A");
        assert_eq!(answers.answered_count(&questions), 1);
        assert!(!answers.all_answered(&questions));

        answers.select_single(&QuestionId::from("q1"), "B");
        assert_eq!(answers.answered_count(&questions), 2);
        assert!(answers.all_answered(&questions));
    }

    #[test]
    fn answered_count_ignores_foreign_ids() {
        let questions = vec![mcq("q1")];
        let mut answers = AnsweredQuestions::new();
        answers.select_single(&QuestionId::from("other"), "A");
        assert_eq!(answers.answered_count(&questions), 0);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut answers = AnsweredQuestions::new();
        answers.select_single(&QuestionId::from("q1"), "A");
        answers.toggle(&QuestionId::from("q2"), "B");
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({"q1": ["A"], "q2": ["B"]}));
    }
}
