use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let start_level = ctx.start_level().value();

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Learn it, then master it" }
                p { class: "view-subtitle",
                    "Upload your course materials and assignment, then work through guided levels."
                }
            }
            div { class: "view-divider" }
            div { class: "home-actions",
                Link { class: "btn btn-primary", to: Route::Process {}, "Start the assignment helper" }
                Link {
                    class: "btn btn-secondary",
                    to: Route::MasterIt { level_id: start_level },
                    "Continue to Master It"
                }
            }
        }
    }
}
