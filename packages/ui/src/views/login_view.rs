use dioxus::prelude::*;
use store::{FieldErrors, FormValues};

use crate::context::use_console;
use crate::login::{login_fields, submit_login, LoginOutcome};
use crate::notice::{show_notice, use_notices};
use crate::views::FieldControl;

/// Username/password form over the placeholder gate. `on_success` decides
/// where to go next.
#[component]
pub fn LoginView(on_success: EventHandler<()>) -> Element {
    let console = use_console();
    let mut notices = use_notices();
    let mut values = use_signal(FormValues::new);
    let mut errors = use_signal(FieldErrors::default);
    let mut loading = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let gate = console.login.clone();
        async move {
            loading.set(true);
            let outcome = submit_login(&gate, &values()).await;
            loading.set(false);
            match outcome {
                LoginOutcome::Incomplete(missing) => errors.set(missing),
                LoginOutcome::Rejected(notice) => {
                    errors.set(FieldErrors::default());
                    show_notice(&mut notices, notice);
                }
                LoginOutcome::Accepted(notice) => {
                    errors.set(FieldErrors::default());
                    show_notice(&mut notices, notice);
                    on_success.call(());
                }
            }
        }
    };

    let controls: Vec<_> = login_fields()
        .into_iter()
        .map(|field| {
            let value = values.read().get(field.name).unwrap_or_default().to_string();
            let error = errors.read().get(field.name);
            (field, value, error)
        })
        .collect();

    rsx! {
        div {
            class: "login-container",
            form {
                class: "login-form",
                onsubmit: onsubmit,
                h2 { "Sign in" }
                for (field, value, error) in controls {
                    FieldControl {
                        key: "{field.name}",
                        field: field.clone(),
                        value,
                        error,
                        on_change: move |(name, value): (&'static str, String)| {
                            values.write().set(name, value)
                        },
                    }
                }
                button {
                    class: "btn primary wide",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Log in" }
                }
            }
        }
    }
}
