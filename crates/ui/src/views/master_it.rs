use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::{Navigator, use_navigator};

use mastery_core::model::{FileRef, LevelId};
use services::notice::{ANSWERS_DOCUMENT_UPLOADED, SUBMITTING_ANSWERS};
use services::{Deferred, LevelController, LevelEffect, LevelError, LevelTimer, Navigation};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{FilePicker, Notices, ViewError};
use crate::vm::{FlashcardVm, QuestionVm, SidebarEntryVm, map_level_vm};

//
// ─── EFFECTS ───────────────────────────────────────────────────────────────────
//

fn scroll_to(target: String) {
    spawn(async move {
        // Let the newly shown section render first.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = eval(&format!(
            "document.getElementById('{target}')?.scrollIntoView({{ behavior: 'smooth', block: 'start' }});"
        ));
    });
}

fn apply_effect(navigator: Navigator, effect: LevelEffect) {
    match effect {
        LevelEffect::FocusFlashcards => scroll_to("flashcards".into()),
        LevelEffect::FocusQuestions => scroll_to("questions".into()),
        LevelEffect::FocusQuestion(index) => scroll_to(format!("question-{index}")),
        LevelEffect::QuestionsCompleted => scroll_to("submit".into()),
        LevelEffect::Navigate(level_id) => {
            let _ = navigator.push(Route::MasterIt {
                level_id: level_id.value(),
            });
        }
    }
}

fn schedule(
    mut controller: Signal<LevelController>,
    navigator: Navigator,
    deferred: Deferred<LevelTimer>,
) {
    spawn(async move {
        tokio::time::sleep(deferred.delay()).await;
        let effect = controller.write().fire(deferred);
        if let Some(effect) = effect {
            apply_effect(navigator, effect);
        }
    });
}

fn show_error(notices: Notices, err: &LevelError) {
    tracing::warn!(%err, "level action failed");
    if let Some(notice) = err.notice() {
        notices.show(notice);
    }
}

async fn load(mut controller: Signal<LevelController>, notices: Notices, level_id: LevelId) {
    let started = controller.write().begin_load(level_id);
    let ticket = match started {
        Ok(ticket) => ticket,
        Err(err) => {
            tracing::warn!(%err, %level_id, "level load not started");
            return;
        }
    };
    let outcome = ticket.execute().await;
    let finished = controller.write().finish_load(outcome);
    match finished {
        Ok(report) => {
            if let Some(warning) = report.warning {
                show_error(notices, &warning);
            }
        }
        Err(LevelError::Stale) => tracing::debug!(%level_id, "superseded level load discarded"),
        Err(err) => show_error(notices, &err),
    }
}

async fn submit(mut controller: Signal<LevelController>, notices: Notices, navigator: Navigator) {
    let started = controller.write().begin_submit();
    let ticket = match started {
        Ok(ticket) => ticket,
        Err(err) => {
            tracing::debug!(%err, "submission not started");
            return;
        }
    };
    notices.show(SUBMITTING_ANSWERS);
    let outcome = ticket.execute().await;
    let finished = controller.write().finish_submit(outcome);
    match finished {
        Ok(Navigation::Level(next)) => {
            let _ = navigator.push(Route::MasterIt {
                level_id: next.value(),
            });
        }
        Ok(Navigation::Finished) => {
            let _ = navigator.push(Route::Home {});
        }
        Err(err) => show_error(notices, &err),
    }
}

async fn upload_answers(
    mut controller: Signal<LevelController>,
    notices: Notices,
    navigator: Navigator,
    document: FileRef,
) {
    let opened = controller.write().begin_final_upload();
    if let Err(err) = opened {
        tracing::debug!(%err, "answers upload not available");
        return;
    }
    let upload = controller.peek().answers_upload(document);
    let stored = match upload {
        Ok(upload) => upload.execute().await,
        Err(err) => Err(err),
    };
    if let Err(err) = stored {
        show_error(notices, &err);
        return;
    }
    notices.show(ANSWERS_DOCUMENT_UPLOADED);
    let stored = controller.write().answers_document_stored();
    match stored {
        Ok(timer) => schedule(controller, navigator, timer),
        Err(err) => tracing::debug!(%err, "upload finished after leaving the level"),
    }
}

//
// ─── VIEW ──────────────────────────────────────────────────────────────────────
//

#[component]
pub fn MasterItView(level_id: u8) -> Element {
    let ctx = use_context::<AppContext>();
    let notices = use_context::<Notices>();
    let navigator = use_navigator();
    let controller = use_signal(|| ctx.level_controller());

    let _loader = use_resource(use_reactive!(|(level_id,)| async move {
        if let Ok(id) = LevelId::new(level_id) {
            load(controller, notices, id).await;
        }
    }));

    if LevelId::new(level_id).is_err() {
        let message = ViewError::InvalidLevel.message();
        return rsx! {
            div { class: "page master-it-page",
                p { class: "view-error", "{message}" }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.push(Route::MasterIt { level_id: 0 });
                    },
                    "Return to Level 0"
                }
            }
        };
    }

    let vm = map_level_vm(&controller.read());

    if !vm.has_level {
        return rsx! {
            div { class: "page master-it-page master-it-empty",
                if vm.loading {
                    p { class: "loading", "Loading level content..." }
                } else {
                    p { "No content available for this level." }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| {
                            let _ = navigator.push(Route::MasterIt { level_id: 0 });
                        },
                        "Return to Level 0"
                    }
                }
            }
        };
    }

    rsx! {
        div { class: "page master-it-page",
            LevelSidebar { entries: vm.sidebar.clone(), loading: vm.loading }
            div { class: "master-it-main",
                if let Some(feedback) = vm.feedback_html.as_ref() {
                    section { class: "card feedback-card",
                        header { class: "card-header",
                            h2 { "Previous Level Feedback" }
                            if let Some(badge) = vm.feedback_badge.as_ref() {
                                span { class: "badge", "{badge}" }
                            }
                        }
                        div { class: "card-body markdown", dangerous_inner_html: "{feedback}" }
                    }
                }

                section { class: "card content-card",
                    header { class: "card-header",
                        h1 { "{vm.title}" }
                        span { class: "badge", "{vm.level_badge}" }
                    }
                    if vm.loading {
                        p { class: "loading", "Loading level content..." }
                    }
                    div { class: "card-body markdown", dangerous_inner_html: "{vm.reading_html}" }
                    if vm.show_continue {
                        div { class: "card-actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut controller = controller;
                                    let result = controller.write().continue_to_flashcards();
                                    match result {
                                        Ok(effect) => apply_effect(navigator, effect),
                                        Err(err) => tracing::debug!(%err, "continue ignored"),
                                    }
                                },
                                "Continue to Flashcards"
                            }
                        }
                    }
                }

                if let Some(card) = vm.flashcard.clone() {
                    FlashcardPanel { card, controller }
                }

                if vm.show_questions {
                    section { class: "card questions-card", id: "questions",
                        header { class: "card-header",
                            h2 { "Assessment Questions" }
                            span { class: "badge", "{vm.completion_status} completed" }
                        }
                        div { class: "card-body",
                            for question in vm.questions.iter().cloned() {
                                QuestionCard { key: "{question.id}", question, controller }
                            }
                            if vm.show_submit {
                                div { class: "card-actions", id: "submit",
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        disabled: !vm.can_submit,
                                        onclick: move |_| {
                                            spawn(submit(controller, notices, navigator));
                                        },
                                        if vm.submitting { "Submitting..." } else { "Submit & Continue" }
                                    }
                                }
                            }
                        }
                    }
                }

                if vm.show_final_upload {
                    section { class: "card final-upload",
                        div { class: "final-upload-banner",
                            h3 { "Congratulations on completing the Mastery level!" }
                            p {
                                "You've mastered the concepts covered in this assignment. Upload your completed assignment to get a comprehensive final review and personalized feedback."
                            }
                        }
                        FilePicker {
                            title: "Answers document",
                            hint: "Upload the document with your completed answers.",
                            button_label: "Choose document",
                            multiple: false,
                            on_pick: move |files: Vec<FileRef>| {
                                if let Some(document) = files.into_iter().next() {
                                    spawn(upload_answers(controller, notices, navigator, document));
                                }
                            },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LevelSidebar(entries: Vec<SidebarEntryVm>, loading: bool) -> Element {
    let navigator = use_navigator();
    rsx! {
        aside { class: "level-sidebar",
            h2 { "Master It" }
            p { class: "muted", "Track your learning progress" }
            h3 { class: "sidebar-label", "Levels" }
            ul {
                for entry in entries {
                    li { key: "{entry.id}",
                        button {
                            class: if entry.active { "level-link level-link--active" } else { "level-link" },
                            r#type: "button",
                            disabled: entry.locked || loading,
                            onclick: move |_| {
                                let _ = navigator.push(Route::MasterIt { level_id: entry.id });
                            },
                            span { class: "level-icon", if entry.is_final { "✓" } else { "📖" } }
                            span { "{entry.title}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FlashcardPanel(card: FlashcardVm, controller: Signal<LevelController>) -> Element {
    let navigator = use_navigator();
    let mut controller = controller;
    let show_answer = card.show_answer;
    rsx! {
        section { class: "card flashcards-card", id: "flashcards",
            header { class: "card-header",
                h2 { "Flashcards" }
                span { class: "badge", "{card.position_label}" }
            }
            div { class: "card-body",
                div { class: "flashcard",
                    h3 { class: "flashcard-side", "{card.side_label}" }
                    p { class: "flashcard-text", "{card.text}" }
                }
                div { class: "flashcard-actions",
                    button {
                        class: "btn btn-outline",
                        r#type: "button",
                        disabled: !card.can_go_back,
                        onclick: move |_| {
                            if let Err(err) = controller.write().previous_flashcard() {
                                tracing::debug!(%err, "previous ignored");
                            }
                        },
                        "Previous"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            if show_answer {
                                controller.write().hide_answer();
                                return;
                            }
                            let revealed = controller.write().reveal_answer();
                            match revealed {
                                Ok(timer) => schedule(controller, navigator, timer),
                                Err(err) => tracing::debug!(%err, "reveal ignored"),
                            }
                        },
                        if show_answer { "Hide Answer" } else { "Show Answer" }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| next_card(controller, navigator),
                        "{card.next_label}"
                    }
                }
                if card.offer_questions {
                    div { class: "card-actions",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| next_card(controller, navigator),
                            "Continue to Questions"
                        }
                    }
                }
            }
        }
    }
}

fn next_card(mut controller: Signal<LevelController>, navigator: Navigator) {
    let stepped = controller.write().next_flashcard();
    match stepped {
        Ok(Some(effect)) => apply_effect(navigator, effect),
        Ok(None) => {}
        Err(err) => tracing::debug!(%err, "next ignored"),
    }
}

#[component]
fn QuestionCard(question: QuestionVm, controller: Signal<LevelController>) -> Element {
    let navigator = use_navigator();
    let class = if question.answered {
        "question question--answered"
    } else {
        "question"
    };
    let index = question.index;
    let kind = question.kind;

    rsx! {
        div { class: "{class}", id: "question-{index}",
            div { class: "question-meta",
                span { class: "muted", "{question.concept_focus}" }
                span { class: "question-kind", "{question.instruction}" }
            }
            h3 { class: "question-text", "{question.text}" }
            div { class: "question-options",
                for option in question.options.iter().cloned() {
                    button {
                        key: "{option.label}",
                        class: if option.selected { "option option--selected" } else { "option" },
                        r#type: "button",
                        disabled: question.locked,
                        onclick: {
                            let id = question.id.clone();
                            let label = option.label.clone();
                            move |_| {
                                let mut controller = controller;
                                let recorded = controller.write().record_answer(&id, &label, index, kind);
                                match recorded {
                                    Ok(Some(timer)) => schedule(controller, navigator, timer),
                                    Ok(None) => {}
                                    Err(err) => tracing::debug!(%err, "answer ignored"),
                                }
                            }
                        },
                        "{option.label}"
                    }
                }
            }
        }
    }
}
