use dioxus::prelude::*;
use store::{FieldErrors, FieldKind, FieldSpec, FormValues, SelectOption};

/// Modal form over a field schema. Holds its own control values, seeded
/// from `initial` when it mounts.
#[component]
pub fn RecordForm(
    title: String,
    fields: Vec<FieldSpec>,
    initial: FormValues,
    errors: FieldErrors,
    #[props(default = false)] submitting: bool,
    on_submit: EventHandler<FormValues>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut values = use_signal(move || initial);

    let controls: Vec<(FieldSpec, String, Option<&'static str>)> = fields
        .into_iter()
        .map(|field| {
            let value = values.read().get(field.name).unwrap_or_default().to_string();
            let error = errors.get(field.name);
            (field, value, error)
        })
        .collect();

    rsx! {
        form {
            class: "record-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_submit.call(values());
            },
            h2 { "{title}" }
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
            div {
                class: "form-actions",
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    class: "btn primary",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Working..." } else { "OK" }
                }
            }
        }
    }
}

/// One labelled control with its inline error.
#[component]
pub fn FieldControl(
    field: FieldSpec,
    value: String,
    #[props(!optional)] error: Option<&'static str>,
    on_change: EventHandler<(&'static str, String)>,
) -> Element {
    let name = field.name;
    let id = format!("field-{name}");

    let control = match &field.kind {
        FieldKind::Text | FieldKind::Number | FieldKind::Password => {
            let input_type = match field.kind {
                FieldKind::Number => "number",
                FieldKind::Password => "password",
                _ => "text",
            };
            rsx! {
                input {
                    id: "{id}",
                    name,
                    r#type: input_type,
                    value: "{value}",
                    oninput: move |evt: FormEvent| on_change.call((name, evt.value())),
                }
            }
        }
        FieldKind::Enum(options) | FieldKind::Reference(options) => {
            let mut options = options.clone();
            // Keep an unloaded reference selectable as its raw id.
            if !value.is_empty() && !options.iter().any(|o| o.value == value) {
                options.push(SelectOption::new(value.as_str(), value.as_str()));
            }
            rsx! {
                select {
                    id: "{id}",
                    name,
                    value: "{value}",
                    onchange: move |evt: FormEvent| on_change.call((name, evt.value())),
                    option { value: "", disabled: true, selected: value.is_empty(), "Select..." }
                    for opt in options {
                        option {
                            key: "{opt.value}",
                            value: "{opt.value}",
                            selected: opt.value == value,
                            "{opt.label}"
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: if error.is_some() { "form-item has-error" } else { "form-item" },
            label {
                r#for: "{id}",
                if field.required {
                    span { class: "required", "* " }
                }
                "{field.label}"
            }
            {control}
            {error.map(|message| rsx! {
                div { class: "form-error", "{message}" }
            })}
        }
    }
}
