use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use mastery_core::model::{AnsweredQuestions, AssessmentQuestion, FileRef, LevelData, LevelId};
use services::{ContentService, ContentServiceError, PriorSubmission};
use storage::{InMemorySessionStore, SessionStore};

use crate::context::{UiApp, build_app_context};
use crate::views::{HomeView, MasterItView, Notices, ProcessView};

/// Serves the same level for every id and records which ids were fetched.
#[derive(Default)]
pub struct StaticContent {
    level: Option<LevelData>,
    fetched: Mutex<Vec<LevelId>>,
}

impl StaticContent {
    pub fn fetched(&self) -> Vec<LevelId> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentService for StaticContent {
    async fn fetch_level(
        &self,
        level_id: LevelId,
        _uploaded_files: &[FileRef],
        _prior: Option<&PriorSubmission>,
    ) -> Result<LevelData, ContentServiceError> {
        self.fetched.lock().unwrap().push(level_id);
        self.level
            .clone()
            .ok_or_else(|| ContentServiceError::Unavailable("no level configured".into()))
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

struct TestApp {
    content: Arc<StaticContent>,
    store: Arc<InMemorySessionStore>,
}

impl UiApp for TestApp {
    fn content_service(&self) -> Arc<dyn ContentService> {
        self.content.clone()
    }

    fn session_store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Process,
    MasterIt(u8),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(app));
    use_context_provider(Notices::default);
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Process => rsx! { ProcessView {} },
        ViewKind::MasterIt(level_id) => rsx! { MasterItView { level_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub content: Arc<StaticContent>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, level: Option<LevelData>) -> ViewHarness {
    let content = Arc::new(StaticContent {
        level,
        fetched: Mutex::new(Vec::new()),
    });
    let app = Arc::new(TestApp {
        content: Arc::clone(&content),
        store: Arc::new(InMemorySessionStore::new()),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, content }
}
