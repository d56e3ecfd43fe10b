use dioxus::prelude::*;
use store::{format_timestamp, lead_label, Contract, ContractStatus, Lead, RecordId, ResourceKind};

use crate::context::use_console;
use crate::hooks::use_collection;
use crate::kanban::{columns, move_notice, perform_move, plan_move, KanbanColumn, KanbanState};
use crate::notice::{show_notice, use_notices};

#[component]
pub fn ContractsKanbanView() -> Element {
    let console = use_console();
    let mut notices = use_notices();
    let contracts = use_collection::<Contract>();
    let leads = use_collection::<Lead>();
    let mut board = use_signal(KanbanState::default);

    let move_card = use_callback(move |(id, to): (RecordId, ContractStatus)| {
        let Some(body) = plan_move(&console.cache, &id, to) else {
            return;
        };
        let api = console.api.clone();
        let cache = console.cache.clone();
        spawn(async move {
            let result = perform_move(&api, &id, body).await;
            show_notice(&mut notices, move_notice(&result));
            if result.is_ok() {
                cache.invalidate(ResourceKind::Contracts);
            }
        });
    });

    let selected = board.read().selected.clone();

    rsx! {
        div {
            class: "screen",
            div {
                class: "screen-header",
                h1 { "Contracts Kanban" }
            }
            if contracts.loading {
                div { class: "loading", "Loading..." }
            } else {
                div {
                    class: "kanban-board",
                    for column in columns(&contracts.items) {
                        KanbanColumnView {
                            key: "{column.status}",
                            column: column.clone(),
                            on_drag: move |id| board.write().start_drag(id),
                            on_drop: move |status| {
                                let dropped = board.write().drop_on(status);
                                if let Some(planned) = dropped {
                                    move_card.call(planned);
                                }
                            },
                            on_open: move |contract| board.write().open(contract),
                        }
                    }
                }
            }
            ContractDrawer {
                contract: selected,
                leads: leads.items.clone(),
                on_close: move |_| board.write().close(),
            }
        }
    }
}

#[component]
fn KanbanColumnView(
    column: KanbanColumn,
    on_drag: EventHandler<RecordId>,
    on_drop: EventHandler<ContractStatus>,
    on_open: EventHandler<Contract>,
) -> Element {
    let status = column.status;
    let title = column.title();

    rsx! {
        div {
            class: "kanban-column",
            ondragover: move |evt: DragEvent| evt.prevent_default(),
            ondrop: move |evt: DragEvent| {
                evt.prevent_default();
                on_drop.call(status);
            },
            h3 { class: "kanban-column-title", "{title}" }
            div {
                class: "kanban-column-content",
                for contract in column.cards {
                    KanbanCard {
                        key: "{contract.id}",
                        contract: contract.clone(),
                        on_drag,
                        on_open,
                    }
                }
            }
        }
    }
}

#[component]
fn KanbanCard(
    contract: Contract,
    on_drag: EventHandler<RecordId>,
    on_open: EventHandler<Contract>,
) -> Element {
    let id = contract.id.clone();
    let name = contract.name.clone();

    rsx! {
        div {
            class: "kanban-card",
            draggable: "true",
            ondragstart: move |_| on_drag.call(id.clone()),
            onclick: move |_| on_open.call(contract.clone()),
            strong { "{name}" }
        }
    }
}

/// Read-only side panel for the selected contract. Renders nothing when no
/// card is selected.
#[component]
pub fn ContractDrawer(
    #[props(!optional)] contract: Option<Contract>,
    leads: Vec<Lead>,
    on_close: EventHandler<()>,
) -> Element {
    let Some(contract) = contract else {
        return rsx! {};
    };
    let title = if contract.name.is_empty() {
        "Contract details".to_string()
    } else {
        contract.name.clone()
    };
    let lead = lead_label(&leads, contract.lead_id.as_ref());
    let created = format_timestamp(contract.created_at.as_ref());
    let updated = format_timestamp(contract.updated_at.as_ref());
    let status = contract.status.title();

    rsx! {
        div {
            class: "drawer-backdrop",
            onclick: move |_| on_close.call(()),
            aside {
                class: "drawer",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                div {
                    class: "drawer-header",
                    h2 { "{title}" }
                    button { class: "btn", onclick: move |_| on_close.call(()), "Close" }
                }
                dl {
                    dt { "ID" }
                    dd { "{contract.id}" }
                    dt { "Status" }
                    dd { "{status}" }
                    dt { "Lead" }
                    dd { "{lead}" }
                    dt { "Amount" }
                    dd { "{contract.amount}" }
                    dt { "Description" }
                    dd { "{contract.description}" }
                    dt { "Document Link" }
                    dd {
                        a {
                            href: "{contract.document_link}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            "{contract.document_link}"
                        }
                    }
                    dt { "Created" }
                    dd { "{created}" }
                    dt { "Updated" }
                    dd { "{updated}" }
                }
            }
        }
    }
}
