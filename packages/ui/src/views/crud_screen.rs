use chrono::Utc;
use dioxus::prelude::*;
use store::{Editable, FormContext, Lead, RecordId, Tabular};

use crate::context::use_console;
use crate::crud::{perform, CrudCommand, CrudState};
use crate::hooks::{use_collection, use_optional_collection};
use crate::notice::{show_notice, use_notices};
use crate::views::{ModalOverlay, RecordForm, RecordTable, TableRow};

/// Body of a table screen for `R`: header with an add button, the record
/// table, and the create/edit modal.
///
/// Called from a component's render function, so its hooks belong to that
/// component.
pub fn crud_screen<R: Editable + Tabular>(title: &'static str) -> Element {
    let console = use_console();
    let mut notices = use_notices();
    let records = use_collection::<R>();
    let leads = use_optional_collection::<Lead>(R::NEEDS_LEADS);
    let mut state = use_signal(CrudState::<R>::new);

    let dispatch = use_callback(move |(command, ctx): (CrudCommand<R>, FormContext)| {
        let Some(effect) = state.write().handle(command, &ctx, Utc::now()) else {
            return;
        };
        let api = console.api.clone();
        let cache = console.cache.clone();
        spawn(async move {
            let result = perform(&api, R::KIND, &effect).await;
            let notice = state.write().settle(&effect, &result);
            show_notice(&mut notices, notice);
            if result.is_ok() {
                cache.invalidate(R::KIND);
            }
        });
    });

    let ctx = FormContext {
        leads: leads.items.clone(),
    };
    let current = state.read().clone();
    let fields = current.fields(&ctx);
    let initial = current.form_values();
    let modal_title = current.modal_title();
    let add_label = format!("Add {}", R::KIND.title());

    let rows: Vec<TableRow> = records
        .items
        .iter()
        .map(|record| TableRow {
            id: record.id().clone(),
            cells: record.cells(&leads.items),
        })
        .collect();
    let items = records.items.clone();

    let on_edit = move |id: RecordId| {
        if let Some(record) = items.iter().find(|r| r.id() == &id) {
            dispatch.call((CrudCommand::OpenEdit(record.clone()), FormContext::default()));
        }
    };

    rsx! {
        div {
            class: "screen",
            div {
                class: "screen-header",
                h1 { "{title}" }
                button {
                    class: "btn primary",
                    onclick: move |_| {
                        dispatch.call((CrudCommand::OpenCreate, FormContext::default()))
                    },
                    "{add_label}"
                }
            }
            if records.loading {
                div { class: "loading", "Loading..." }
            } else {
                RecordTable {
                    columns: R::columns().to_vec(),
                    rows,
                    on_edit,
                    on_delete: move |id: RecordId| {
                        dispatch.call((CrudCommand::Delete(id), FormContext::default()))
                    },
                }
            }
            if current.is_modal_open {
                ModalOverlay {
                    on_close: move |_| dispatch.call((CrudCommand::Close, FormContext::default())),
                    RecordForm {
                        title: modal_title,
                        fields,
                        initial,
                        errors: current.errors.clone(),
                        submitting: current.submitting,
                        on_submit: move |values| {
                            dispatch.call((CrudCommand::Submit(values), ctx.clone()))
                        },
                        on_cancel: move |_| {
                            dispatch.call((CrudCommand::Close, FormContext::default()))
                        },
                    }
                }
            }
        }
    }
}
