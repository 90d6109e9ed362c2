use std::sync::Arc;

use mastery_core::model::{
    AnsweredQuestions, AssessmentQuestion, FileRef, Flashcard, LevelData, LevelId, ProgressState,
    QuestionId, QuestionType, level_title,
};
use storage::repository::SessionStore;

use super::flow::{
    AnswersUpload, LoadOutcome, LoadReport, LoadTicket, SubmitOutcome, SubmitTicket,
};
use super::timers::{LevelEffect, LevelTimer, LevelTimings};
use crate::content::{ContentService, PriorSubmission};
use crate::deferred::{Deferred, TimerSlot};
use crate::error::LevelError;

static NO_ANSWERS: AnsweredQuestions = AnsweredQuestions::new();

/// Where the navigator should go after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Level(LevelId),
    Finished,
}

/// One row of the level sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub id: LevelId,
    pub title: &'static str,
    pub active: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Load,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    kind: RequestKind,
    seq: u64,
    level_id: LevelId,
}

//
// ─── LEVEL SESSION ─────────────────────────────────────────────────────────────
//

/// Everything tied to the loaded level. Swapped as one value on every load.
#[derive(Debug, Clone)]
struct LevelSession {
    id: LevelId,
    data: LevelData,
    flashcard_index: usize,
    show_answer: bool,
    answers: AnsweredQuestions,
    progress: ProgressState,
}

impl LevelSession {
    fn fresh(id: LevelId, data: LevelData) -> Self {
        Self {
            id,
            data,
            flashcard_index: 0,
            show_answer: false,
            answers: AnsweredQuestions::new(),
            progress: ProgressState::Reading,
        }
    }

    fn questions(&self) -> &[AssessmentQuestion] {
        &self.data.assessment_questions
    }

    fn all_answered(&self) -> bool {
        self.answers.all_answered(self.questions())
    }

    fn first_unanswered(&self) -> Option<usize> {
        self.questions()
            .iter()
            .position(|q| !self.answers.is_answered(q))
    }

    fn enter_questions(&mut self) -> LevelEffect {
        self.progress = ProgressState::Questions;
        if self.all_answered() {
            self.progress = ProgressState::Completed;
            LevelEffect::QuestionsCompleted
        } else {
            LevelEffect::FocusQuestions
        }
    }

    /// Move the cursor forward; past the last card this opens the questions instead.
    fn step_flashcard(&mut self) -> Option<LevelEffect> {
        if self.flashcard_index + 1 < self.data.flashcards.len() {
            self.flashcard_index += 1;
            self.show_answer = false;
            None
        } else if self.progress == ProgressState::Flashcards {
            Some(self.enter_questions())
        } else {
            None
        }
    }

    fn refresh_completion(&mut self) -> Option<LevelEffect> {
        if self.progress == ProgressState::Questions && self.all_answered() {
            self.progress = ProgressState::Completed;
            Some(LevelEffect::QuestionsCompleted)
        } else {
            None
        }
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one level session: reading, flashcards, questions, submission.
///
/// Network work is split into `begin_*` / `execute` / `finish_*` so the caller
/// never holds the controller across an await. Delayed transitions come back
/// through [`LevelController::fire`].
pub struct LevelController {
    content: Arc<dyn ContentService>,
    store: Arc<dyn SessionStore>,
    timings: LevelTimings,
    level_id: LevelId,
    session: Option<LevelSession>,
    uploaded_files: Vec<FileRef>,
    pending: Option<Pending>,
    request_seq: u64,
    flashcard_timer: TimerSlot,
    question_timer: TimerSlot,
    navigation_timer: TimerSlot,
}

impl LevelController {
    #[must_use]
    pub fn new(content: Arc<dyn ContentService>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            content,
            store,
            timings: LevelTimings::default(),
            level_id: LevelId::OVERVIEW,
            session: None,
            uploaded_files: Vec::new(),
            pending: None,
            request_seq: 0,
            flashcard_timer: TimerSlot::new(),
            question_timer: TimerSlot::new(),
            navigation_timer: TimerSlot::new(),
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: LevelTimings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn timings(&self) -> LevelTimings {
        self.timings
    }

    #[must_use]
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Id of the level currently shown (the last one loaded successfully).
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn level(&self) -> Option<&LevelData> {
        self.session.as_ref().map(|s| &s.data)
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.session.as_ref().map_or_else(
            || level_title(self.level_id).to_owned(),
            |s| s.data.title(s.id),
        )
    }

    #[must_use]
    pub fn progress(&self) -> ProgressState {
        self.session
            .as_ref()
            .map_or(ProgressState::Reading, |s| s.progress)
    }

    #[must_use]
    pub fn flashcard_index(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.flashcard_index)
    }

    #[must_use]
    pub fn flashcard_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.data.flashcards.len())
    }

    #[must_use]
    pub fn show_answer(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.show_answer)
    }

    #[must_use]
    pub fn current_flashcard(&self) -> Option<&Flashcard> {
        self.session
            .as_ref()
            .and_then(|s| s.data.flashcards.get(s.flashcard_index))
    }

    #[must_use]
    pub fn questions(&self) -> &[AssessmentQuestion] {
        self.session
            .as_ref()
            .map(LevelSession::questions)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn answers(&self) -> &AnsweredQuestions {
        self.session.as_ref().map_or(&NO_ANSWERS, |s| &s.answers)
    }

    #[must_use]
    pub fn uploaded_files(&self) -> &[FileRef] {
        &self.uploaded_files
    }

    /// Replace the files handed over by the upload UI.
    pub fn set_uploaded_files(&mut self, files: Vec<FileRef>) {
        self.uploaded_files = files;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.pending, Some(p) if p.kind == RequestKind::Load)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.pending, Some(p) if p.kind == RequestKind::Submit)
    }

    /// Level id of the fetch in flight, if any.
    #[must_use]
    pub fn pending_level(&self) -> Option<LevelId> {
        self.pending
            .filter(|p| p.kind == RequestKind::Load)
            .map(|p| p.level_id)
    }

    #[must_use]
    pub fn level_entries(&self) -> Vec<LevelEntry> {
        LevelId::all()
            .map(|id| LevelEntry {
                id,
                title: level_title(id),
                active: id == self.level_id,
                locked: id > self.level_id,
            })
            .collect()
    }

    fn session_mut(&mut self) -> Result<&mut LevelSession, LevelError> {
        self.session.as_mut().ok_or(LevelError::NoLevel)
    }

    fn cancel_timers(&mut self) {
        self.flashcard_timer.cancel();
        self.question_timer.cancel();
        self.navigation_timer.cancel();
    }

    /// A new load replaces a pending load; its outcome then comes back stale.
    /// Anything else overlapping a request is refused.
    fn start_request(&mut self, kind: RequestKind, level_id: LevelId) -> Result<u64, LevelError> {
        match self.pending {
            Some(p) if p.kind == RequestKind::Load && kind == RequestKind::Load => {
                tracing::debug!(
                    superseded = %p.level_id,
                    %level_id,
                    "pending level load superseded"
                );
            }
            Some(_) => return Err(LevelError::Busy),
            None => {}
        }
        self.request_seq += 1;
        self.pending = Some(Pending {
            kind,
            seq: self.request_seq,
            level_id,
        });
        Ok(self.request_seq)
    }

    fn close_request(&mut self, kind: RequestKind, seq: u64) -> Result<(), LevelError> {
        match self.pending {
            Some(p) if p.kind == kind && p.seq == seq => {
                self.pending = None;
                Ok(())
            }
            _ => Err(LevelError::Stale),
        }
    }

    //
    // ─── LEVEL TRANSITIONS ─────────────────────────────────────────────────────
    //

    /// Start fetching `level_id`.
    ///
    /// Levels after the overview carry the current level's questions and the full
    /// answer map as the prior submission.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Busy` while a submission is in flight. A pending
    /// load is superseded instead, whether or not its ticket still runs.
    pub fn begin_load(&mut self, level_id: LevelId) -> Result<LoadTicket, LevelError> {
        let seq = self.start_request(RequestKind::Load, level_id)?;
        let prior = (!level_id.is_overview()).then(|| PriorSubmission {
            questions: self.questions().to_vec(),
            answers: self.answers().clone(),
        });
        tracing::debug!(%level_id, seq, "level load started");
        Ok(LoadTicket::new(
            seq,
            level_id,
            self.uploaded_files.clone(),
            prior,
            Arc::clone(&self.content),
            Arc::clone(&self.store),
        ))
    }

    /// Apply a finished fetch.
    ///
    /// On success the level data, flashcard cursor, answer map and progress are
    /// replaced together and every pending timer is dropped. On failure nothing
    /// but the loading flag changes.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Fetch` when the service failed and
    /// `LevelError::Stale` for an outcome of a superseded request.
    pub fn finish_load(&mut self, outcome: LoadOutcome) -> Result<LoadReport, LevelError> {
        self.close_request(RequestKind::Load, outcome.seq)?;
        let LoadOutcome {
            level_id,
            files,
            warning,
            result,
            ..
        } = outcome;

        let data = result.map_err(|err| {
            tracing::warn!(%level_id, %err, "level fetch failed");
            LevelError::Fetch(err)
        })?;

        tracing::info!(
            %level_id,
            flashcards = data.flashcards.len(),
            questions = data.assessment_questions.len(),
            "level loaded"
        );
        self.cancel_timers();
        self.session = Some(LevelSession::fresh(level_id, data));
        self.level_id = level_id;
        if !files.is_empty() {
            self.uploaded_files = files;
        }

        Ok(LoadReport { level_id, warning })
    }

    /// Fetch and apply `level_id` in one call.
    ///
    /// # Errors
    ///
    /// See [`LevelController::begin_load`] and [`LevelController::finish_load`].
    pub async fn load_level(&mut self, level_id: LevelId) -> Result<LoadReport, LevelError> {
        let ticket = self.begin_load(level_id)?;
        let outcome = ticket.execute().await;
        self.finish_load(outcome)
    }

    //
    // ─── READING & FLASHCARDS ──────────────────────────────────────────────────
    //

    /// Leave the reading phase. A level without flashcards goes straight to questions.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::InvalidState` outside the reading phase.
    pub fn continue_to_flashcards(&mut self) -> Result<LevelEffect, LevelError> {
        let session = self.session_mut()?;
        if session.progress != ProgressState::Reading {
            return Err(LevelError::InvalidState("reading is already finished"));
        }
        if session.data.flashcards.is_empty() {
            return Ok(session.enter_questions());
        }
        session.progress = ProgressState::Flashcards;
        Ok(LevelEffect::FocusFlashcards)
    }

    /// # Errors
    ///
    /// Returns `LevelError::InvalidState` while the flashcards are hidden.
    pub fn next_flashcard(&mut self) -> Result<Option<LevelEffect>, LevelError> {
        let session = self.session.as_mut().ok_or(LevelError::NoLevel)?;
        if !session.progress.shows_flashcards() {
            return Err(LevelError::InvalidState("flashcards are not open"));
        }
        self.flashcard_timer.cancel();
        Ok(session.step_flashcard())
    }

    /// Step back one card; a no-op on the first card.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::InvalidState` while the flashcards are hidden.
    pub fn previous_flashcard(&mut self) -> Result<(), LevelError> {
        let session = self.session.as_mut().ok_or(LevelError::NoLevel)?;
        if !session.progress.shows_flashcards() {
            return Err(LevelError::InvalidState("flashcards are not open"));
        }
        self.flashcard_timer.cancel();
        if session.flashcard_index > 0 {
            session.flashcard_index -= 1;
            session.show_answer = false;
        }
        Ok(())
    }

    /// Show the current card's answer and schedule the automatic advance.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::InvalidState` while the flashcards are hidden or empty.
    pub fn reveal_answer(&mut self) -> Result<Deferred<LevelTimer>, LevelError> {
        let delay = self.timings.flashcard_advance;
        let session = self.session.as_mut().ok_or(LevelError::NoLevel)?;
        if !session.progress.shows_flashcards() || session.data.flashcards.is_empty() {
            return Err(LevelError::InvalidState("flashcards are not open"));
        }
        session.show_answer = true;
        let index = session.flashcard_index;
        Ok(self
            .flashcard_timer
            .arm(LevelTimer::FlashcardAdvance { index }, delay))
    }

    /// Turn the current card back to its heading, dropping the pending advance.
    pub fn hide_answer(&mut self) {
        self.flashcard_timer.cancel();
        if let Some(session) = self.session.as_mut() {
            session.show_answer = false;
        }
    }

    //
    // ─── QUESTIONS ─────────────────────────────────────────────────────────────
    //

    /// Record a selection for the question at `index`.
    ///
    /// Single-answer questions replace their selection and return the deferred
    /// advance. Multiple-answer questions toggle `option` and may complete the
    /// level immediately.
    ///
    /// # Errors
    ///
    /// Returns `LevelError` without touching the answer map if the questions are
    /// not open, the question or option is unknown, or `kind` does not match.
    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        option: &str,
        index: usize,
        kind: QuestionType,
    ) -> Result<Option<Deferred<LevelTimer>>, LevelError> {
        let delay = self.timings.question_advance;
        let session = self.session.as_mut().ok_or(LevelError::NoLevel)?;
        if !matches!(
            session.progress,
            ProgressState::Questions | ProgressState::Completed
        ) {
            return Err(LevelError::InvalidState("questions are not open"));
        }

        let question = session
            .data
            .assessment_questions
            .iter()
            .find(|q| &q.id == question_id)
            .ok_or_else(|| LevelError::UnknownQuestion(question_id.clone()))?;
        if question.kind != kind {
            return Err(LevelError::InvalidState("question type does not match"));
        }
        if !question.has_option(option) {
            return Err(LevelError::UnknownOption {
                question: question_id.clone(),
                option: option.to_owned(),
            });
        }

        session.answers.record(question_id, option, kind);
        match kind {
            QuestionType::Mcq => Ok(Some(
                self.question_timer
                    .arm(LevelTimer::QuestionAdvance { index }, delay),
            )),
            QuestionType::Maq => {
                session.refresh_completion();
                Ok(None)
            }
        }
    }

    /// Whether the question at `index` is shown.
    ///
    /// Single-answer questions unlock one by one: each needs its predecessor
    /// touched, unless it was already answered itself.
    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        let questions = self.questions();
        let answers = self.answers();
        let Some(question) = questions.get(index) else {
            return false;
        };
        if question.kind == QuestionType::Maq || index == 0 || answers.is_touched(&question.id) {
            return true;
        }
        answers.is_touched(&questions[index - 1].id)
    }

    /// An answered single-answer question no longer accepts clicks.
    #[must_use]
    pub fn is_option_locked(&self, index: usize) -> bool {
        self.questions()
            .get(index)
            .is_some_and(|q| q.kind == QuestionType::Mcq && self.answers().is_answered(q))
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers().answered_count(self.questions())
    }

    /// `answered/total`, as shown above the questions.
    #[must_use]
    pub fn completion_status(&self) -> String {
        format!("{}/{}", self.answered_count(), self.questions().len())
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.pending.is_none() && self.progress() == ProgressState::Completed
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Start submitting the completed level.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::NotCompleted` before every question is answered and
    /// `LevelError::Busy` while another request is in flight.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, LevelError> {
        let level_id = {
            let session = self.session.as_ref().ok_or(LevelError::NoLevel)?;
            if session.progress != ProgressState::Completed {
                return Err(LevelError::NotCompleted);
            }
            session.id
        };
        let seq = self.start_request(RequestKind::Submit, level_id)?;
        tracing::debug!(%level_id, seq, "submission started");
        Ok(SubmitTicket::new(
            seq,
            level_id,
            self.questions().to_vec(),
            self.answers().clone(),
            self.uploaded_files.clone(),
            Arc::clone(&self.content),
            Arc::clone(&self.store),
        ))
    }

    /// Apply a finished submission and name the level to navigate to.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Submit` when the service failed and
    /// `LevelError::Stale` for an outcome of a superseded request.
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> Result<Navigation, LevelError> {
        self.close_request(RequestKind::Submit, outcome.seq)?;
        let SubmitOutcome {
            level_id,
            files,
            result,
            ..
        } = outcome;

        result.map_err(|err| {
            tracing::warn!(%level_id, %err, "answer submission failed");
            LevelError::Submit(err)
        })?;

        if !files.is_empty() {
            self.uploaded_files = files;
        }
        tracing::info!(%level_id, "answers submitted");
        Ok(level_id
            .next()
            .map_or(Navigation::Finished, Navigation::Level))
    }

    /// Submit and return the next level in one call.
    ///
    /// # Errors
    ///
    /// See [`LevelController::begin_submit`] and [`LevelController::finish_submit`].
    pub async fn submit_and_advance(&mut self) -> Result<Navigation, LevelError> {
        let ticket = self.begin_submit()?;
        let outcome = ticket.execute().await;
        self.finish_submit(outcome)
    }

    //
    // ─── FINAL UPLOAD ──────────────────────────────────────────────────────────
    //

    /// Open the answers-document upload of the mastery level. Reopening a
    /// running upload is allowed so a failed write can be retried.
    ///
    /// # Errors
    ///
    /// Returns `LevelError` outside a completed mastery level.
    pub fn begin_final_upload(&mut self) -> Result<(), LevelError> {
        let session = self.session_mut()?;
        if session.id != LevelId::MASTERY {
            return Err(LevelError::InvalidState(
                "the answers upload belongs to the mastery level",
            ));
        }
        match session.progress {
            ProgressState::Upload => Ok(()),
            ProgressState::Completed => {
                session.progress = ProgressState::Upload;
                Ok(())
            }
            _ => Err(LevelError::NotCompleted),
        }
    }

    /// The answers document has been written; schedule the move to the final review.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::InvalidState` when no upload is open.
    pub fn answers_document_stored(&mut self) -> Result<Deferred<LevelTimer>, LevelError> {
        if self.progress() != ProgressState::Upload || self.session.is_none() {
            return Err(LevelError::InvalidState("no answers upload in progress"));
        }
        Ok(self
            .navigation_timer
            .arm(LevelTimer::OpenFinalReview, self.timings.final_review))
    }

    /// Prepare the session-store write of the answers document.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::InvalidState` when no upload is open.
    pub fn answers_upload(&self, document: FileRef) -> Result<AnswersUpload, LevelError> {
        if self.progress() != ProgressState::Upload || self.session.is_none() {
            return Err(LevelError::InvalidState("no answers upload in progress"));
        }
        Ok(AnswersUpload::new(document, Arc::clone(&self.store)))
    }

    /// Store the answers document in the session and schedule the final review.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Storage` if the document cannot be written, or
    /// `LevelError::InvalidState` when no upload is open.
    pub async fn store_answers_document(
        &mut self,
        document: &FileRef,
    ) -> Result<Deferred<LevelTimer>, LevelError> {
        self.answers_upload(document.clone())?.execute().await?;
        self.answers_document_stored()
    }

    //
    // ─── TIMERS ────────────────────────────────────────────────────────────────
    //

    /// Run a deferred transition whose delay has elapsed.
    ///
    /// Returns `None` when the task was superseded or its preconditions no
    /// longer hold.
    pub fn fire(&mut self, deferred: Deferred<LevelTimer>) -> Option<LevelEffect> {
        match *deferred.task() {
            LevelTimer::FlashcardAdvance { index } => {
                if !self.flashcard_timer.take(&deferred) {
                    return None;
                }
                let session = self.session.as_mut()?;
                if session.flashcard_index != index
                    || !session.show_answer
                    || !session.progress.shows_flashcards()
                {
                    return None;
                }
                session.step_flashcard()
            }
            LevelTimer::QuestionAdvance { index } => {
                if !self.question_timer.take(&deferred) {
                    return None;
                }
                let session = self.session.as_mut()?;
                if session.progress != ProgressState::Questions {
                    return None;
                }
                if let Some(effect) = session.refresh_completion() {
                    return Some(effect);
                }
                let next = index + 1;
                if next < session.questions().len() {
                    Some(LevelEffect::FocusQuestion(next))
                } else {
                    session.first_unanswered().map(LevelEffect::FocusQuestion)
                }
            }
            LevelTimer::OpenFinalReview => {
                if !self.navigation_timer.take(&deferred) {
                    return None;
                }
                (self.progress() == ProgressState::Upload)
                    .then_some(LevelEffect::Navigate(LevelId::FINAL_REVIEW))
            }
        }
    }
}
