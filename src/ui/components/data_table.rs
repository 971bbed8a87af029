use dioxus::prelude::*;

use crate::ui::components::pagination::Pagination;
use crate::ui::styles::{
    button_style, field_error_style, loading_overlay_style, table_cell_style,
    table_container_style, table_header_cell_style, table_style,
};
use crate::ui::view::{BodyState, CellView, ColumnView, InputKind, TableView};

#[component]
pub fn DataTable(
    view: TableView,
    on_sort: EventHandler<String>,
    on_page: EventHandler<u32>,
    on_page_size: EventHandler<u32>,
    on_edit: EventHandler<String>,
    on_edit_field: EventHandler<(String, String)>,
    on_save: EventHandler<()>,
    on_cancel: EventHandler<()>,
    on_delete: EventHandler<String>,
) -> Element {
    let loading = view.loading;
    let colspan = view.columns.len() + 1;
    let columns = view.columns.clone();

    let body = match view.body {
        BodyState::Loading => rsx! {
            tr { td { colspan: "{colspan}", style: "{table_cell_style()}", "Loading…" } }
        },
        BodyState::Empty => rsx! {
            tr { td { colspan: "{colspan}", style: "{table_cell_style()}", "No records found" } }
        },
        BodyState::Rows => rsx! {
            {view.rows.iter().map(|row| {
                let row_id_for_edit = row.id.clone();
                let row_id_for_delete = row.id.clone();
                let editing = row.editing;
                let saving = row.saving;
                let cells = row.cells.clone();
                let columns = columns.clone();
                rsx!(
                    tr { key: "{row.id}",
                        {cells.into_iter().zip(columns).map(|(cell, column)| rsx!(
                            Cell {
                                column,
                                cell,
                                editing,
                                on_edit_field,
                            }
                        ))}
                        td { style: "{table_cell_style()} white-space: nowrap;",
                            if editing {
                                button {
                                    style: "{button_style(saving)}",
                                    disabled: saving,
                                    onclick: move |_| on_save.call(()),
                                    if saving { "Saving…" } else { "Save" }
                                }
                                button {
                                    style: "{button_style(saving)}",
                                    disabled: saving,
                                    onclick: move |_| on_cancel.call(()),
                                    "Cancel"
                                }
                            } else {
                                button {
                                    style: "{button_style(false)}",
                                    onclick: move |_| on_edit.call(row_id_for_edit.clone()),
                                    "Edit"
                                }
                                button {
                                    style: "{button_style(false)}",
                                    onclick: move |_| on_delete.call(row_id_for_delete.clone()),
                                    "Delete"
                                }
                            }
                        }
                    }
                )
            })}
        },
    };

    rsx! {
        div { style: "{table_container_style()}",
            if loading {
                div { style: "{loading_overlay_style()}", "Loading…" }
            }
            table { style: "{table_style()}",
                thead {
                    tr {
                        {view.columns.iter().map(|column| {
                            let field = column.field.clone();
                            let field_for_sort = column.field.clone();
                            let sortable = column.sortable;
                            let header = column.header.clone();
                            let indicator = column.sort_indicator.unwrap_or("");
                            rsx!(
                                th {
                                    key: "{field}",
                                    style: "{table_header_cell_style(sortable)}",
                                    onclick: move |_| {
                                        if sortable {
                                            on_sort.call(field_for_sort.clone());
                                        }
                                    },
                                    "{header} {indicator}"
                                }
                            )
                        })}
                        th { style: "{table_header_cell_style(false)}", "Actions" }
                    }
                }
                tbody { {body} }
            }
        }
        if let Some(pagination) = view.pagination.clone() {
            Pagination {
                view: pagination,
                on_page,
                on_page_size,
            }
        }
    }
}

#[component]
fn Cell(
    column: ColumnView,
    cell: CellView,
    editing: bool,
    on_edit_field: EventHandler<(String, String)>,
) -> Element {
    let Some(input_kind) = column.input.filter(|_| editing) else {
        return rsx! {
            td { style: "{table_cell_style()}", "{cell.text}" }
        };
    };
    let field = column.field.clone();

    rsx! {
        td { style: "{table_cell_style()}",
            if input_kind == InputKind::Select {
                select {
                    value: "{cell.edit_value}",
                    onchange: move |event| on_edit_field.call((field.clone(), event.value())),
                    {column.options.iter().map(|choice| {
                        let selected = *choice == cell.edit_value;
                        let caption = if choice.is_empty() { "(none)" } else { choice.as_str() };
                        rsx!(option { value: "{choice}", selected, "{caption}" })
                    })}
                }
            } else {
                input {
                    r#type: input_kind.html_type(),
                    value: "{cell.edit_value}",
                    oninput: move |event| on_edit_field.call((field.clone(), event.value())),
                }
            }
            if let Some(error) = cell.error.as_ref() {
                div { style: "{field_error_style()}", "{error}" }
            }
        }
    }
}
