use dioxus::prelude::*;

/// Top navigation bar. The app passes its route links as children.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        nav {
            class: "navbar",
            span { class: "navbar-brand", "CRM Console" }
            div { class: "navbar-links", {children} }
        }
    }
}
