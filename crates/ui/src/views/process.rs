use dioxus::prelude::*;
use dioxus_router::use_navigator;

use mastery_core::model::{AssistanceLevel, CourseId, FileRef};
use services::{WizardController, WizardError, WizardStep};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{FilePicker, Notices};
use crate::vm::{StepState, map_wizard_vm};

fn report(mut error: Signal<Option<String>>, result: Result<(), WizardError>) {
    match result {
        Ok(()) => error.set(None),
        Err(err) => {
            tracing::debug!(%err, "wizard action refused");
            error.set(Some(err.to_string()));
        }
    }
}

#[component]
pub fn ProcessView() -> Element {
    let ctx = use_context::<AppContext>();
    let notices = use_context::<Notices>();
    let navigator = use_navigator();
    let mut wizard = use_signal(|| ctx.wizard_controller());
    let mut course_input = use_signal(String::new);
    let error = use_signal(|| None::<String>);

    let vm = map_wizard_vm(&wizard.read());
    let start_level = ctx.start_level().value();

    let on_materials = move |files: Vec<FileRef>| {
        let result = wizard.write().upload_materials(files);
        report(error, result);
    };

    let on_assignment = move |files: Vec<FileRef>| {
        let started = wizard.write().upload_assignment(files);
        let analysis = match started {
            Ok(analysis) => analysis,
            Err(err) => return report(error, Err(err)),
        };
        report(error, Ok(()));

        let publisher = wizard.read().upload_publisher();
        spawn(async move {
            if let Err(err) = publisher.publish().await {
                tracing::warn!(%err, "could not store uploaded files");
                report(error, Err(err));
            }
        });
        spawn(async move {
            tokio::time::sleep(analysis.delay()).await;
            wizard.write().fire(analysis);
        });
    };

    let steps = vm.steps.iter().map(|step| {
        let class = match step.state {
            StepState::Done => "wizard-step wizard-step--done",
            StepState::Current => "wizard-step wizard-step--current",
            StepState::Upcoming => "wizard-step",
        };
        rsx! {
            li { class: "{class}",
                span { class: "wizard-step-number",
                    if step.state == StepState::Done { "✓" } else { "{step.number}" }
                }
                span { class: "wizard-step-title", "{step.title}" }
            }
        }
    });

    rsx! {
        div { class: "page process-page",
            button {
                class: "btn btn-ghost",
                r#type: "button",
                disabled: !vm.can_go_back,
                onclick: move |_| {
                    let result = wizard.write().previous_step().map(|_| ());
                    report(error, result);
                },
                "← Back"
            }
            header { class: "view-header",
                h2 { class: "view-title", "Assignment Helper" }
                p { class: "view-subtitle",
                    "Get personalized assistance that adapts to your learning level."
                }
            }
            ol { class: "wizard-steps", {steps} }
            div { class: "wizard-progress",
                div { class: "wizard-progress-bar", style: "width: {vm.progress_percent}%;" }
            }
            section { class: "wizard-card",
                h3 { class: "wizard-card-title", "{vm.title}" }
                p { class: "wizard-card-description", "{vm.description}" }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                match vm.step {
                    WizardStep::SelectCourse => rsx! {
                        form {
                            class: "course-form",
                            onsubmit: move |evt: FormEvent| {
                                evt.prevent_default();
                                let name = course_input.read().trim().to_owned();
                                if name.is_empty() {
                                    return;
                                }
                                let result = wizard.write().select_course(CourseId::new(name));
                                report(error, result);
                                course_input.set(String::new());
                            },
                            input {
                                class: "input",
                                r#type: "text",
                                placeholder: "Course name, e.g. Engineering Mechanics",
                                value: "{course_input}",
                                oninput: move |evt| course_input.set(evt.value()),
                            }
                            button { class: "btn btn-primary", r#type: "submit", "Continue" }
                        }
                    },
                    WizardStep::UploadMaterials => rsx! {
                        FilePicker {
                            title: "Course materials",
                            hint: "Lecture notes, textbook chapters and other study materials.",
                            button_label: "Choose files",
                            multiple: true,
                            on_pick: on_materials,
                        }
                    },
                    WizardStep::UploadAssignment => rsx! {
                        FilePicker {
                            title: "Assignment",
                            hint: "Instructions, rubrics and requirements.",
                            button_label: "Choose files",
                            multiple: true,
                            on_pick: on_assignment,
                        }
                    },
                    WizardStep::Analyze => rsx! {
                        div { class: "analysis",
                            h3 { "Analyzing Your Materials" }
                            p {
                                "Our AI is processing your course materials and assignment instructions to understand the concepts and requirements."
                            }
                            div { class: "analysis-bar" }
                        }
                    },
                    WizardStep::SelectLevel => rsx! {
                        LevelChoice { wizard, error, selected: vm.assistance_level }
                    },
                    WizardStep::GuidedLearning => rsx! {
                        div { class: "guided-learning",
                            p { "Assistance level {vm.assistance_level}" }
                            if let Some(course) = vm.course_label.as_ref() {
                                p { "Course: {course}" }
                            }
                            p { "{vm.upload_count} files ready for your learning levels." }
                            div { class: "guided-actions",
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    onclick: move |_| {
                                        let _ = navigator.push(Route::MasterIt { level_id: start_level });
                                    },
                                    "Open Master It"
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| {
                                        let done = wizard.write().complete();
                                        match done {
                                            Ok(notice) => notices.show(notice),
                                            Err(err) => report(error, Err(err)),
                                        }
                                    },
                                    "Complete session"
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn LevelChoice(
    wizard: Signal<WizardController>,
    error: Signal<Option<String>>,
    selected: u8,
) -> Element {
    let mut wizard = wizard;
    let mut choice = use_signal(|| selected);
    let buttons = (AssistanceLevel::MIN..=AssistanceLevel::MAX).map(|level| {
        let class = if choice() == level {
            "level-choice level-choice--selected"
        } else {
            "level-choice"
        };
        rsx! {
            button {
                class: "{class}",
                r#type: "button",
                onclick: move |_| choice.set(level),
                "Level {level}"
            }
        }
    });

    rsx! {
        div { class: "level-choices", {buttons} }
        button {
            class: "btn btn-primary",
            r#type: "button",
            onclick: move |_| {
                let result = AssistanceLevel::new(choice()).map_err(|err| err.to_string());
                match result {
                    Ok(level) => {
                        let result = wizard.write().select_level(level);
                        report(error, result);
                    }
                    Err(message) => {
                        let mut error = error;
                        error.set(Some(message));
                    }
                }
            },
            "Continue"
        }
    }
}
