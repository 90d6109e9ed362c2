use dioxus::prelude::*;
use mastery_core::model::FileRef;

use crate::vm::file_ref_from_bytes;

#[component]
pub fn FilePicker(
    title: &'static str,
    hint: &'static str,
    button_label: &'static str,
    multiple: bool,
    on_pick: EventHandler<Vec<FileRef>>,
) -> Element {
    let mut reading = use_signal(|| false);

    rsx! {
        div { class: "upload-card",
            h3 { class: "upload-title", "{title}" }
            p { class: "upload-hint", "{hint}" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: reading(),
                onclick: move |_| {
                    reading.set(true);
                    spawn(async move {
                        let files = pick_files(multiple).await;
                        reading.set(false);
                        if !files.is_empty() {
                            on_pick.call(files);
                        }
                    });
                },
                if reading() { "Reading files..." } else { "{button_label}" }
            }
        }
    }
}

async fn pick_files(multiple: bool) -> Vec<FileRef> {
    let dialog = rfd::AsyncFileDialog::new();
    let handles = if multiple {
        dialog.pick_files().await.unwrap_or_default()
    } else {
        dialog.pick_file().await.into_iter().collect()
    };

    let mut files = Vec::with_capacity(handles.len());
    for handle in handles {
        let name = handle.file_name();
        let bytes = handle.read().await;
        files.push(file_ref_from_bytes(&name, &bytes));
    }
    tracing::debug!(count = files.len(), "files picked");
    files
}
