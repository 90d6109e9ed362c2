use std::sync::Arc;

use mastery_core::model::LevelId;
use services::{ContentService, LevelController, LevelTimings, WizardController, WizardTimings};
use storage::SessionStore;

pub trait UiApp: Send + Sync {
    fn content_service(&self) -> Arc<dyn ContentService>;
    fn session_store(&self) -> Arc<dyn SessionStore>;

    /// Level the "Master It" entry points open first.
    fn start_level(&self) -> LevelId {
        LevelId::OVERVIEW
    }

    fn level_timings(&self) -> LevelTimings {
        LevelTimings::default()
    }

    fn wizard_timings(&self) -> WizardTimings {
        WizardTimings::default()
    }
}

#[derive(Clone)]
pub struct AppContext {
    content: Arc<dyn ContentService>,
    store: Arc<dyn SessionStore>,
    start_level: LevelId,
    level_timings: LevelTimings,
    wizard_timings: WizardTimings,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            content: app.content_service(),
            store: app.session_store(),
            start_level: app.start_level(),
            level_timings: app.level_timings(),
            wizard_timings: app.wizard_timings(),
        }
    }

    #[must_use]
    pub fn start_level(&self) -> LevelId {
        self.start_level
    }

    #[must_use]
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Fresh controller for one visit of the level page.
    #[must_use]
    pub fn level_controller(&self) -> LevelController {
        LevelController::new(Arc::clone(&self.content), Arc::clone(&self.store))
            .with_timings(self.level_timings)
    }

    #[must_use]
    pub fn wizard_controller(&self) -> WizardController {
        WizardController::new(Arc::clone(&self.store)).with_timings(self.wizard_timings)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: Arc<dyn UiApp>) -> AppContext {
    AppContext::new(&app)
}
