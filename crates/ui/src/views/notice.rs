use dioxus::prelude::*;
use services::Notice;

/// Shared toast slot. Only the latest notice is shown.
#[derive(Clone, Copy)]
pub struct Notices {
    current: Signal<Option<Notice>>,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            current: Signal::new(None),
        }
    }
}

impl Notices {
    pub fn show(self, notice: Notice) {
        let mut current = self.current;
        current.set(Some(notice));
    }

    pub fn dismiss(self) {
        let mut current = self.current;
        current.set(None);
    }

    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        self.current.read().clone()
    }
}

#[component]
pub fn NoticeHost() -> Element {
    let notices = use_context::<Notices>();
    let Some(notice) = notices.current() else {
        return rsx! {};
    };
    let tone = if notice.is_error() {
        "toast toast--error"
    } else {
        "toast"
    };

    rsx! {
        div { class: "{tone}", role: "status",
            div { class: "toast-body",
                strong { class: "toast-title", "{notice.title}" }
                p { class: "toast-description", "{notice.description}" }
            }
            button {
                class: "toast-close",
                r#type: "button",
                onclick: move |_| notices.dismiss(),
                "×"
            }
        }
    }
}
