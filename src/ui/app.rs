use std::path::PathBuf;

use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::domain::pricing::parse_number;
use crate::platform::desktop::files::{pick_upload, SaveDialogSink};
use crate::ui::state::app_state::{AppState, GridRow};
use crate::usecase::graph::Event;
use crate::usecase::services::import_service::UploadKind;

const NONE_OPTION_VALUE: &str = "";
const PANEL_STYLE: &str =
    "border: 1px solid #ccc; border-radius: 8px; padding: 12px; background: #fff; display: flex; flex-direction: column; gap: 8px;";
const BUTTON_STYLE: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";
const STATUS_STYLE: &str = "color: #555; font-size: 13px;";

fn upload(mut state: AppState, kind: UploadKind) {
    match pick_upload(kind) {
        Ok(Some(upload)) => {
            let event = match kind {
                UploadKind::Catalog => Event::UploadCatalog(upload),
                UploadKind::Base => Event::UploadBase(upload),
            };
            state.apply(vec![event]);
        }
        Ok(None) => tracing::debug!(?kind, "upload dialog closed"),
        Err(err) => tracing::error!(?kind, "upload could not be read: {err:#}"),
    }
}

fn export(mut state: AppState, event: Event, export_dir: Option<PathBuf>) {
    let outcome = state.apply(vec![event]);
    if !outcome.downloads.is_empty() {
        state.deliver_all(&outcome.downloads, &SaveDialogSink::new(export_dir));
    }
}

#[component]
fn DataGrid(
    title: &'static str,
    columns: Vec<String>,
    rows: Vec<GridRow>,
    empty_label: &'static str,
    on_select: EventHandler<GridRow>,
) -> Element {
    rsx! {
        div { style: "font-weight: 600;", "{title}" }
        if rows.is_empty() {
            div { style: "{STATUS_STYLE}", "{empty_label}" }
        } else {
            div { style: "max-height: 280px; overflow: auto; border: 1px solid #ddd;",
                table { style: "border-collapse: collapse; width: 100%;",
                    thead {
                        tr {
                            for header in columns.iter() {
                                th { style: "position: sticky; top: 0; background: #f3f3f3; border: 1px solid #bbb; padding: 4px 8px; text-align: left;",
                                    "{header}"
                                }
                            }
                        }
                    }
                    tbody {
                        {rows.iter().enumerate().map(|(row_idx, row)| {
                            let row = row.clone();
                            let background = if row.selected { "#eef4ff" } else { "transparent" };
                            let cells = row.cells.clone();
                            rsx!(
                                tr {
                                    key: "{row_idx}",
                                    style: "cursor: pointer; background: {background};",
                                    onclick: move |_| on_select.call(row.clone()),
                                    for value in cells.iter() {
                                        td { style: "border: 1px solid #ddd; padding: 4px 8px;", "{value}" }
                                    }
                                }
                            )
                        })}
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let export_dir = config.export_dir.clone();
    let mut state = AppState::new(config);
    let view = state.view();

    let unit_price_text = state.unit_price_text;
    let unit_count_text = state.unit_count_text;
    let edit_price_text = state.edit_price_text;
    let edit_count_text = state.edit_count_text;
    let selected_value = view
        .selected_code
        .clone()
        .unwrap_or_else(|| NONE_OPTION_VALUE.to_string());
    let base_selection = view.base_selection.clone().unwrap_or_default();
    let can_edit_row = view.can_edit_row();
    let export_dir_for_csv = export_dir.clone();

    rsx! {
        div { style: "font-family: sans-serif; padding: 16px; background: #fafafa; display: flex; flex-direction: column; gap: 12px;",
            h2 { style: "margin: 0;", "Base de precios mensual" }

            div { style: "display: flex; gap: 12px;",
                div { style: "{PANEL_STYLE} flex: 1;",
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| upload(state, UploadKind::Catalog),
                        "Cargar catálogo"
                    }
                    div { style: "{STATUS_STYLE}", "{view.status.catalog}" }
                }
                div { style: "{PANEL_STYLE} flex: 1;",
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| upload(state, UploadKind::Base),
                        "Cargar base"
                    }
                    div { style: "{STATUS_STYLE}", "{view.status.base}" }
                }
            }

            div { style: "{PANEL_STYLE}",
                DataGrid {
                    title: "Catálogo",
                    columns: view.catalog_columns.clone(),
                    rows: view.catalog_rows.clone(),
                    empty_label: "Sin catálogo cargado",
                    on_select: move |row: GridRow| {
                        let selected = (!row.selected).then_some(row.cells);
                        state.apply(vec![Event::CatalogRowSelected(selected)]);
                    },
                }
                div { style: "display: flex; align-items: center; gap: 8px;",
                    span { "Producto" }
                    select {
                        value: "{selected_value}",
                        onchange: move |event| {
                            let value = event.value();
                            let code = (value != NONE_OPTION_VALUE).then_some(value);
                            state.apply(vec![Event::DropdownChanged(code)]);
                        },
                        option { value: NONE_OPTION_VALUE, "(sin selección)" }
                        for code in view.dropdown_options.iter() {
                            option {
                                value: "{code}",
                                selected: view.selected_code.as_deref() == Some(code.as_str()),
                                "{code}"
                            }
                        }
                    }
                    span { style: "{STATUS_STYLE}", "{view.selection_status}" }
                }
            }

            div { style: "{PANEL_STYLE}",
                div { style: "display: flex; align-items: center; gap: 8px;",
                    span { "Precio unitario" }
                    input {
                        r#type: "number",
                        step: "0.01",
                        value: "{unit_price_text}",
                        oninput: move |event| {
                            let text = event.value();
                            let value = parse_number(&text);
                            state.unit_price_text.set(text);
                            state.apply(vec![Event::UnitPriceChanged(value)]);
                        },
                    }
                    span { "Unidades por caja" }
                    input {
                        r#type: "number",
                        step: "1",
                        value: "{unit_count_text}",
                        oninput: move |event| {
                            let text = event.value();
                            let value = parse_number(&text);
                            state.unit_count_text.set(text);
                            state.apply(vec![Event::UnitCountChanged(value)]);
                        },
                    }
                    span { style: "font-weight: 600;", "{view.total}" }
                }
                div { style: "display: flex; align-items: center; gap: 8px;",
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| {
                            state.apply(vec![Event::AddProduct]);
                        },
                        "Agregar a la base"
                    }
                    span { style: "{STATUS_STYLE}", "{view.status.update}" }
                }
            }

            div { style: "{PANEL_STYLE}",
                DataGrid {
                    title: "Base",
                    columns: view.base_columns.clone(),
                    rows: view.base_rows.clone(),
                    empty_label: "Sin base cargada",
                    on_select: move |row: GridRow| {
                        let selected = if row.selected { None } else { row.code };
                        state.apply(vec![Event::BaseRowSelected(selected)]);
                    },
                }
                div { style: "display: flex; gap: 8px;",
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: !can_edit_row,
                        onclick: move |_| {
                            state.apply(vec![Event::OpenEdit]);
                        },
                        "Editar"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: !can_edit_row,
                        onclick: move |_| {
                            state.apply(vec![Event::OpenDelete]);
                        },
                        "Eliminar"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| export(state, Event::ExportSpreadsheet, export_dir.clone()),
                        "Exportar Excel"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| export(state, Event::ExportCsv, export_dir_for_csv.clone()),
                        "Exportar CSV"
                    }
                }
            }

            if view.edit_open {
                div {
                    style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;",
                    div {
                        style: "background: #fff; padding: 16px; border: 1px solid #999; min-width: 300px; display: flex; flex-direction: column; gap: 8px;",
                        div { style: "font-weight: 600;", "Editar {base_selection}" }
                        label { "Precio unitario" }
                        input {
                            r#type: "number",
                            step: "0.01",
                            value: "{edit_price_text}",
                            oninput: move |event| {
                                let text = event.value();
                                let value = parse_number(&text);
                                state.edit_price_text.set(text);
                                state.apply(vec![Event::EditUnitPriceChanged(value)]);
                            },
                        }
                        label { "Unidades por caja" }
                        input {
                            r#type: "number",
                            step: "1",
                            value: "{edit_count_text}",
                            oninput: move |event| {
                                let text = event.value();
                                let value = parse_number(&text);
                                state.edit_count_text.set(text);
                                state.apply(vec![Event::EditUnitCountChanged(value)]);
                            },
                        }
                        div { style: "display: flex; gap: 8px;",
                            button {
                                style: "{BUTTON_STYLE}",
                                onclick: move |_| {
                                    state.apply(vec![Event::ConfirmEdit]);
                                },
                                "Guardar"
                            }
                            button {
                                style: "{BUTTON_STYLE}",
                                onclick: move |_| {
                                    state.apply(vec![Event::CloseEdit]);
                                },
                                "Cancelar"
                            }
                        }
                    }
                }
            }

            if view.delete_open {
                div {
                    style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;",
                    div {
                        style: "background: #fff; padding: 16px; border: 1px solid #999; min-width: 280px;",
                        div { style: "margin-bottom: 8px; font-weight: 600;", "Eliminar producto" }
                        div { style: "margin-bottom: 12px;", "¿Eliminar {base_selection} de la base?" }
                        div { style: "display: flex; gap: 8px;",
                            button {
                                style: "{BUTTON_STYLE}",
                                onclick: move |_| {
                                    state.apply(vec![Event::ConfirmDelete]);
                                },
                                "Eliminar"
                            }
                            button {
                                style: "{BUTTON_STYLE}",
                                onclick: move |_| {
                                    state.apply(vec![Event::CancelDelete]);
                                },
                                "Cancelar"
                            }
                        }
                    }
                }
            }
        }
    }
}
