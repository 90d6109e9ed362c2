use std::sync::Arc;

use mastery_core::model::{AssistanceLevel, CourseId, FileRef};
use storage::repository::SessionStore;
use storage::save_uploaded_files;

use super::steps::{AnalysisComplete, WizardStep, WizardTimings};
use crate::deferred::{Deferred, TimerSlot};
use crate::error::WizardError;
use crate::notice::{LEARNING_SESSION_COMPLETED, Notice};

/// Linear state machine behind the assignment-helper pages.
pub struct WizardController {
    store: Arc<dyn SessionStore>,
    timings: WizardTimings,
    step: WizardStep,
    course: Option<CourseId>,
    materials: Vec<FileRef>,
    assignment: Vec<FileRef>,
    assistance: AssistanceLevel,
    analysis: TimerSlot,
}

impl WizardController {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            timings: WizardTimings::default(),
            step: WizardStep::SelectCourse,
            course: None,
            materials: Vec::new(),
            assignment: Vec::new(),
            assistance: AssistanceLevel::default(),
            analysis: TimerSlot::new(),
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: WizardTimings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn course(&self) -> Option<&CourseId> {
        self.course.as_ref()
    }

    #[must_use]
    pub fn materials(&self) -> &[FileRef] {
        &self.materials
    }

    #[must_use]
    pub fn assignment(&self) -> &[FileRef] {
        &self.assignment
    }

    #[must_use]
    pub fn assistance_level(&self) -> AssistanceLevel {
        self.assistance
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.step == WizardStep::Analyze && self.analysis.is_pending()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.step.allows_back()
    }

    /// Fill of the step bar, 0 on the first step and 100 on the last.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let done = u16::from(self.step.number() - 1);
        let span = u16::from(WizardStep::GuidedLearning.number() - 1);
        u8::try_from(done * 100 / span).unwrap_or(100)
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::OutOfSequence {
                expected,
                actual: self.step,
            })
        }
    }

    /// # Errors
    ///
    /// Returns `WizardError::OutOfSequence` unless the wizard is on step 1.
    pub fn select_course(&mut self, course: CourseId) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SelectCourse)?;
        tracing::debug!(%course, "course selected");
        self.course = Some(course);
        self.step = WizardStep::UploadMaterials;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `WizardError::OutOfSequence` unless the wizard is on step 2.
    pub fn upload_materials(&mut self, files: Vec<FileRef>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::UploadMaterials)?;
        tracing::debug!(count = files.len(), "materials uploaded");
        self.materials = files;
        self.step = WizardStep::UploadAssignment;
        Ok(())
    }

    /// Store the assignment and start the analysis.
    ///
    /// The returned task must be handed back to [`WizardController::fire`] once
    /// its delay has passed.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::OutOfSequence` unless the wizard is on step 3.
    pub fn upload_assignment(
        &mut self,
        files: Vec<FileRef>,
    ) -> Result<Deferred<AnalysisComplete>, WizardError> {
        self.expect_step(WizardStep::UploadAssignment)?;
        tracing::debug!(count = files.len(), "assignment uploaded, analysing");
        self.assignment = files;
        self.step = WizardStep::Analyze;
        Ok(self.analysis.arm(AnalysisComplete, self.timings.analysis))
    }

    /// Finish the analysis. Returns `false` for a cancelled or superseded task.
    pub fn fire(&mut self, deferred: Deferred<AnalysisComplete>) -> bool {
        if !self.analysis.take(&deferred) || self.step != WizardStep::Analyze {
            return false;
        }
        tracing::info!("material analysis finished");
        self.step = WizardStep::SelectLevel;
        true
    }

    /// # Errors
    ///
    /// Returns `WizardError::OutOfSequence` unless the wizard is on step 5.
    pub fn select_level(&mut self, level: AssistanceLevel) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SelectLevel)?;
        tracing::debug!(level = level.value(), "assistance level selected");
        self.assistance = level;
        self.step = WizardStep::GuidedLearning;
        Ok(())
    }

    /// Close the guided-learning session and start over.
    ///
    /// The chosen assistance level is kept as the next default.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::OutOfSequence` unless the wizard is on step 6.
    pub fn complete(&mut self) -> Result<Notice, WizardError> {
        self.expect_step(WizardStep::GuidedLearning)?;
        self.analysis.cancel();
        self.step = WizardStep::SelectCourse;
        self.course = None;
        self.materials.clear();
        self.assignment.clear();
        tracing::info!("guided learning completed");
        Ok(LEARNING_SESSION_COMPLETED)
    }

    /// # Errors
    ///
    /// Returns `WizardError::BackNotAllowed` on steps 1, 4 and 6.
    pub fn previous_step(&mut self) -> Result<WizardStep, WizardError> {
        let target = self
            .step
            .back_target()
            .ok_or(WizardError::BackNotAllowed(self.step))?;
        self.step = target;
        Ok(target)
    }

    /// Snapshot of the uploads for the session store.
    #[must_use]
    pub fn upload_publisher(&self) -> UploadPublisher {
        let files = self
            .materials
            .iter()
            .chain(&self.assignment)
            .cloned()
            .collect();
        UploadPublisher {
            store: Arc::clone(&self.store),
            files,
        }
    }
}

/// Writes the wizard's uploads under `uploadedFiles`, detached from the controller.
pub struct UploadPublisher {
    store: Arc<dyn SessionStore>,
    files: Vec<FileRef>,
}

impl UploadPublisher {
    #[must_use]
    pub fn files(&self) -> &[FileRef] {
        &self.files
    }

    /// Returns how many files were written.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Storage` if the session store rejects the write.
    pub async fn publish(self) -> Result<usize, WizardError> {
        save_uploaded_files(self.store.as_ref(), &self.files).await?;
        tracing::debug!(count = self.files.len(), "uploaded files published");
        Ok(self.files.len())
    }
}
