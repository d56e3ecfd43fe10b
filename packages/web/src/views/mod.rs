//! Route targets. Each one is a thin wrapper over a `ui` screen.

use dioxus::prelude::*;
use ui::views::{ContractsKanbanView, ContractsView, LeadsView, LoginView, UsersView, Welcome};
use ui::Navbar;

use crate::Route;

/// Layout for every route except `/login`: the navigation bar over the page.
#[component]
pub fn Shell() -> Element {
    rsx! {
        Navbar {
            Link { to: Route::Leads {}, active_class: "active", "Leads" }
            Link { to: Route::Contracts {}, active_class: "active", "Contracts Table" }
            Link { to: Route::ContractsKanban {}, active_class: "active", "Contracts Kanban" }
            Link { to: Route::Users {}, active_class: "active", "Users" }
        }
        Outlet::<Route> {}
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { Welcome {} }
}

#[component]
pub fn Leads() -> Element {
    rsx! { LeadsView {} }
}

#[component]
pub fn Contracts() -> Element {
    rsx! { ContractsView {} }
}

#[component]
pub fn ContractsKanban() -> Element {
    rsx! { ContractsKanbanView {} }
}

#[component]
pub fn Users() -> Element {
    rsx! { UsersView {} }
}

#[component]
pub fn Login() -> Element {
    let nav = use_navigator();

    rsx! {
        LoginView {
            on_success: move |_| {
                nav.push(Route::ContractsKanban {});
            },
        }
    }
}
