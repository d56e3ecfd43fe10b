use dioxus::prelude::*;

use crate::notice::{use_notices, NoticeLevel};

/// Stack of live notices at the top of the page. Click one to dismiss it.
#[component]
pub fn NoticeTray() -> Element {
    let mut log = use_notices();
    let entries = log().entries.clone();

    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "notice-tray",
            for entry in entries {
                div {
                    key: "{entry.id}",
                    class: match entry.notice.level {
                        NoticeLevel::Success => "notice success",
                        NoticeLevel::Error => "notice error",
                    },
                    onclick: move |_| log.write().dismiss(entry.id),
                    span { class: "notice-time", "{entry.timestamp}" }
                    span { " {entry.notice.message}" }
                }
            }
        }
    }
}
