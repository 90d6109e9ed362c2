#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mastery_core::model::{
    AnsweredQuestions, AssessmentQuestion, FileRef, Flashcard, LevelData, LevelId, LevelStatus,
    QuestionType,
};
use services::{ContentService, ContentServiceError, LevelController, PriorSubmission};
use storage::{InMemorySessionStore, SessionStore};

#[derive(Debug, Clone)]
pub struct FetchCall {
    pub level_id: LevelId,
    pub files: Vec<FileRef>,
    pub prior: Option<PriorSubmission>,
}

#[derive(Debug, Clone)]
pub struct SubmitCall {
    pub level_id: LevelId,
    pub questions: Vec<AssessmentQuestion>,
    pub answers: AnsweredQuestions,
    pub files: Vec<FileRef>,
}

#[derive(Default)]
struct Script {
    levels: HashMap<LevelId, LevelData>,
    fetch_failures: VecDeque<LevelId>,
    submit_failures: usize,
    fetches: Vec<FetchCall>,
    submits: Vec<SubmitCall>,
}

/// Scripted content service that records every call.
#[derive(Clone, Default)]
pub struct FakeContentService {
    script: Arc<Mutex<Script>>,
}

impl FakeContentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(self, id: u8, data: LevelData) -> Self {
        self.script
            .lock()
            .unwrap()
            .levels
            .insert(LevelId::new(id).unwrap(), data);
        self
    }

    /// The next fetch of `id` fails once.
    pub fn fail_next_fetch(&self, id: u8) {
        self.script
            .lock()
            .unwrap()
            .fetch_failures
            .push_back(LevelId::new(id).unwrap());
    }

    pub fn fail_next_submit(&self) {
        self.script.lock().unwrap().submit_failures += 1;
    }

    pub fn fetches(&self) -> Vec<FetchCall> {
        self.script.lock().unwrap().fetches.clone()
    }

    pub fn submits(&self) -> Vec<SubmitCall> {
        self.script.lock().unwrap().submits.clone()
    }
}

#[async_trait]
impl ContentService for FakeContentService {
    async fn fetch_level(
        &self,
        level_id: LevelId,
        uploaded_files: &[FileRef],
        prior: Option<&PriorSubmission>,
    ) -> Result<LevelData, ContentServiceError> {
        let mut script = self.script.lock().unwrap();
        script.fetches.push(FetchCall {
            level_id,
            files: uploaded_files.to_vec(),
            prior: prior.cloned(),
        });
        if let Some(pos) = script.fetch_failures.iter().position(|id| *id == level_id) {
            script.fetch_failures.remove(pos);
            return Err(ContentServiceError::Unavailable("scripted failure".into()));
        }
        script
            .levels
            .get(&level_id)
            .cloned()
            .ok_or_else(|| ContentServiceError::Unavailable(format!("no level {level_id}")))
    }

    async fn submit_answers(
        &self,
        level_id: LevelId,
        questions: &[AssessmentQuestion],
        answers: &AnsweredQuestions,
        uploaded_files: &[FileRef],
    ) -> Result<(), ContentServiceError> {
        let mut script = self.script.lock().unwrap();
        script.submits.push(SubmitCall {
            level_id,
            questions: questions.to_vec(),
            answers: answers.clone(),
            files: uploaded_files.to_vec(),
        });
        if script.submit_failures > 0 {
            script.submit_failures -= 1;
            return Err(ContentServiceError::Unavailable("scripted failure".into()));
        }
        Ok(())
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

pub fn flashcards(n: usize) -> Vec<Flashcard> {
    (1..=n)
        .map(|i| Flashcard::new(format!("Term {i}"), format!("Meaning {i}")))
        .collect()
}

pub fn mcq(id: &str) -> AssessmentQuestion {
    AssessmentQuestion::new(id, QuestionType::Mcq, "Pick one", ["A", "B", "C"])
}

pub fn maq(id: &str) -> AssessmentQuestion {
    AssessmentQuestion::new(id, QuestionType::Maq, "Pick any", ["A", "B", "C"])
}

pub fn level(flashcard_count: usize, questions: Vec<AssessmentQuestion>) -> LevelData {
    LevelData::new(
        LevelStatus::BasicUnderstanding,
        "## Reading\n\nSome text.",
        flashcards(flashcard_count),
        questions,
    )
    .with_feedback("Good start.")
}

pub fn file(name: &str) -> FileRef {
    FileRef::new(name, "contents", "text/plain")
}

pub struct Harness {
    pub content: FakeContentService,
    pub store: Arc<InMemorySessionStore>,
    pub controller: LevelController,
}

pub fn harness(content: FakeContentService) -> Harness {
    let store = Arc::new(InMemorySessionStore::new());
    let dyn_store: Arc<dyn SessionStore> = store.clone();
    let controller = LevelController::new(Arc::new(content.clone()), dyn_store);
    Harness {
        content,
        store,
        controller,
    }
}
