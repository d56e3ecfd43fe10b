use dioxus::prelude::*;
use store::RecordId;

/// One table row: the record id and its rendered cells.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

#[component]
pub fn RecordTable(
    columns: Vec<&'static str>,
    rows: Vec<TableRow>,
    on_edit: EventHandler<RecordId>,
    on_delete: EventHandler<RecordId>,
) -> Element {
    let span = columns.len() + 1;

    rsx! {
        table {
            class: "record-table",
            thead {
                tr {
                    for column in columns {
                        th { key: "{column}", "{column}" }
                    }
                    th { "Actions" }
                }
            }
            tbody {
                if rows.is_empty() {
                    tr {
                        td { class: "empty", colspan: "{span}", "No data" }
                    }
                }
                for row in rows {
                    RecordRow { key: "{row.id}", row: row.clone(), on_edit, on_delete }
                }
            }
        }
    }
}

#[component]
fn RecordRow(
    row: TableRow,
    on_edit: EventHandler<RecordId>,
    on_delete: EventHandler<RecordId>,
) -> Element {
    let edit_id = row.id.clone();
    let delete_id = row.id.clone();

    rsx! {
        tr {
            for (i, cell) in row.cells.iter().enumerate() {
                td { key: "{i}", "{cell}" }
            }
            td {
                class: "actions",
                button {
                    class: "btn",
                    onclick: move |_| on_edit.call(edit_id.clone()),
                    "Edit"
                }
                button {
                    class: "btn danger",
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    "Delete"
                }
            }
        }
    }
}
