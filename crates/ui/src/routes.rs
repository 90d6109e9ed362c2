use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HomeView, MasterItView, NoticeHost, ProcessView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/process", ProcessView)] Process {},
        #[route("/master-it/:level_id", MasterItView)] MasterIt { level_id: u8 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
            NoticeHost {}
        }
    }
}

#[component]
fn Navbar() -> Element {
    rsx! {
        nav { class: "navbar",
            Link { class: "navbar-brand", to: Route::Home {}, "Mastery" }
            ul { class: "navbar-links",
                li { Link { to: Route::Process {}, "Assignment Helper" } }
                li { Link { to: Route::MasterIt { level_id: 0 }, "Master It" } }
            }
        }
    }
}
