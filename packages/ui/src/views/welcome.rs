use dioxus::prelude::*;

#[component]
pub fn Welcome() -> Element {
    rsx! {
        div {
            class: "screen welcome",
            h1 { "Welcome to the CRM Console!" }
            p { "Pick a section from the navigation bar." }
        }
    }
}
