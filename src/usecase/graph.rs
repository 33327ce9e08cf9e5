//! Event routing for a [`Session`].
//!
//! Every user action arrives as an [`Event`]. Each reactive [`Cell`] declares
//! the triggers it listens to and the cells it derives from; one update cycle
//! visits the cells in dependency order, hands each the events routed to it,
//! and re-runs derived cells whose upstream changed in the same cycle. A
//! cycle always runs to completion before the next one starts.

use std::collections::BTreeSet;

use crate::domain::pricing::{autofill_unit_count, total};
use crate::errors::PriceBaseError;
use crate::usecase::ports::download::Download;
use crate::usecase::services::export_service::ExportFormat;
use crate::usecase::services::import_service::Upload;
use crate::usecase::services::selection_service::SelectionEvent;
use crate::usecase::session::{selected_row, Session};

pub const BASE_UPDATED_MESSAGE: &str = "Base actualizada";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    UploadCatalog(Upload),
    UploadBase(Upload),
    /// Catalog grid row clicked; the full row, `None` on deselect.
    CatalogRowSelected(Option<Vec<String>>),
    DropdownChanged(Option<String>),
    UnitPriceChanged(Option<f64>),
    UnitCountChanged(Option<f64>),
    AddProduct,
    /// Base grid row clicked; its product code, `None` on deselect.
    BaseRowSelected(Option<String>),
    OpenEdit,
    EditUnitPriceChanged(Option<f64>),
    EditUnitCountChanged(Option<f64>),
    ConfirmEdit,
    CloseEdit,
    OpenDelete,
    ConfirmDelete,
    CancelDelete,
    ExportSpreadsheet,
    ExportCsv,
}

/// Identity of the control that fired an event, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trigger {
    UploadCatalog,
    UploadBase,
    CatalogGrid,
    Dropdown,
    UnitPrice,
    UnitCount,
    AddProduct,
    BaseGrid,
    OpenEdit,
    EditUnitPrice,
    EditUnitCount,
    ConfirmEdit,
    CloseEdit,
    OpenDelete,
    ConfirmDelete,
    CancelDelete,
    ExportSpreadsheet,
    ExportCsv,
}

impl Event {
    pub fn trigger(&self) -> Trigger {
        match self {
            Event::UploadCatalog(_) => Trigger::UploadCatalog,
            Event::UploadBase(_) => Trigger::UploadBase,
            Event::CatalogRowSelected(_) => Trigger::CatalogGrid,
            Event::DropdownChanged(_) => Trigger::Dropdown,
            Event::UnitPriceChanged(_) => Trigger::UnitPrice,
            Event::UnitCountChanged(_) => Trigger::UnitCount,
            Event::AddProduct => Trigger::AddProduct,
            Event::BaseRowSelected(_) => Trigger::BaseGrid,
            Event::OpenEdit => Trigger::OpenEdit,
            Event::EditUnitPriceChanged(_) => Trigger::EditUnitPrice,
            Event::EditUnitCountChanged(_) => Trigger::EditUnitCount,
            Event::ConfirmEdit => Trigger::ConfirmEdit,
            Event::CloseEdit => Trigger::CloseEdit,
            Event::OpenDelete => Trigger::OpenDelete,
            Event::ConfirmDelete => Trigger::ConfirmDelete,
            Event::CancelDelete => Trigger::CancelDelete,
            Event::ExportSpreadsheet => Trigger::ExportSpreadsheet,
            Event::ExportCsv => Trigger::ExportCsv,
        }
    }
}

/// A piece of session state with its own update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    Catalog,
    Selection,
    UnitPrice,
    UnitCount,
    Total,
    Base,
    BaseSelection,
    EditDialog,
    DeleteDialog,
    Downloads,
}

impl Cell {
    /// Evaluation order. Upstream cells come first; `Base` precedes both
    /// dialogs so a confirm commits the staged values before the dialog
    /// closes and drops them.
    pub const ORDER: [Cell; 10] = [
        Cell::Catalog,
        Cell::Selection,
        Cell::UnitPrice,
        Cell::UnitCount,
        Cell::Total,
        Cell::Base,
        Cell::BaseSelection,
        Cell::EditDialog,
        Cell::DeleteDialog,
        Cell::Downloads,
    ];

    pub fn inputs(self) -> &'static [Trigger] {
        match self {
            Cell::Catalog => &[Trigger::UploadCatalog],
            Cell::Selection => &[Trigger::CatalogGrid, Trigger::Dropdown],
            Cell::UnitPrice => &[Trigger::UnitPrice],
            Cell::UnitCount => &[Trigger::UnitCount],
            Cell::Total => &[],
            Cell::Base => &[
                Trigger::UploadBase,
                Trigger::AddProduct,
                Trigger::ConfirmEdit,
                Trigger::ConfirmDelete,
            ],
            Cell::BaseSelection => &[Trigger::BaseGrid],
            Cell::EditDialog => &[
                Trigger::OpenEdit,
                Trigger::EditUnitPrice,
                Trigger::EditUnitCount,
                Trigger::ConfirmEdit,
                Trigger::CloseEdit,
            ],
            Cell::DeleteDialog => &[
                Trigger::OpenDelete,
                Trigger::ConfirmDelete,
                Trigger::CancelDelete,
            ],
            Cell::Downloads => &[Trigger::ExportSpreadsheet, Trigger::ExportCsv],
        }
    }

    /// Cells whose change re-runs this one.
    pub fn upstream(self) -> &'static [Cell] {
        match self {
            Cell::UnitCount => &[Cell::Selection],
            Cell::Total => &[Cell::UnitPrice, Cell::UnitCount],
            Cell::BaseSelection => &[Cell::Base],
            Cell::Catalog
            | Cell::Selection
            | Cell::UnitPrice
            | Cell::Base
            | Cell::EditDialog
            | Cell::DeleteDialog
            | Cell::Downloads => &[],
        }
    }
}

/// What one update cycle produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleOutcome {
    pub changed: BTreeSet<Cell>,
    pub downloads: Vec<Download>,
}

impl CycleOutcome {
    pub fn touched(&self, cell: Cell) -> bool {
        self.changed.contains(&cell)
    }
}

impl Session {
    pub fn dispatch(&mut self, event: Event) -> CycleOutcome {
        self.dispatch_cycle(vec![event])
    }

    /// Runs one update cycle for events that fired together.
    pub fn dispatch_cycle(&mut self, events: Vec<Event>) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();

        for cell in Cell::ORDER {
            let routed: Vec<&Event> = events
                .iter()
                .filter(|event| cell.inputs().contains(&event.trigger()))
                .collect();
            let upstream_changed = cell
                .upstream()
                .iter()
                .any(|upstream| outcome.changed.contains(upstream));
            if routed.is_empty() && !upstream_changed {
                continue;
            }

            tracing::debug!(?cell, routed = routed.len(), upstream_changed, "running cell");
            let changed = match cell {
                Cell::Catalog => self.run_catalog(&routed),
                Cell::Selection => self.run_selection(&routed),
                Cell::UnitPrice => self.run_unit_price(&routed),
                Cell::UnitCount => self.run_unit_count(&routed, upstream_changed),
                Cell::Total => self.run_total(),
                Cell::Base => self.run_base(&routed),
                Cell::BaseSelection => self.run_base_selection(&routed, upstream_changed),
                Cell::EditDialog => self.run_edit_dialog(&routed),
                Cell::DeleteDialog => self.run_delete_dialog(&routed),
                Cell::Downloads => self.run_downloads(&routed, &mut outcome.downloads),
            };
            if changed {
                outcome.changed.insert(cell);
            }
        }

        outcome
    }

    fn run_catalog(&mut self, events: &[&Event]) -> bool {
        let mut changed = false;
        for event in events {
            let Event::UploadCatalog(upload) = event else {
                continue;
            };
            match self.importer.import_catalog(upload) {
                Ok(catalog) => {
                    self.status.catalog = format!("Catálogo cargado: {} productos", catalog.len());
                    self.catalog.replace(catalog);
                }
                Err(err) => {
                    tracing::warn!(file = %upload.file_name, "catalog upload rejected: {err}");
                    self.status.catalog = err.to_string();
                }
            }
            changed = true;
        }
        changed
    }

    fn run_selection(&mut self, events: &[&Event]) -> bool {
        let selection_events: Vec<SelectionEvent> = events
            .iter()
            .filter_map(|event| match event {
                Event::CatalogRowSelected(row) => Some(SelectionEvent::Grid(row.clone())),
                Event::DropdownChanged(code) => Some(SelectionEvent::Dropdown(code.clone())),
                _ => None,
            })
            .collect();
        self.selection
            .reconcile(&selection_events, self.catalog.get())
    }

    fn run_unit_price(&mut self, events: &[&Event]) -> bool {
        let latest = events.iter().rev().find_map(|event| match event {
            Event::UnitPriceChanged(value) => Some(*value),
            _ => None,
        });
        match latest {
            Some(value) if value != self.unit_price => {
                self.unit_price = value;
                true
            }
            _ => false,
        }
    }

    /// A value typed in this cycle wins over the catalog autofill.
    fn run_unit_count(&mut self, events: &[&Event], selection_changed: bool) -> bool {
        let typed = events.iter().rev().find_map(|event| match event {
            Event::UnitCountChanged(value) => Some(*value),
            _ => None,
        });
        let next = match typed {
            Some(value) => value,
            None if selection_changed => {
                match autofill_unit_count(self.selection.code(), self.catalog.get()) {
                    Some(count) => Some(count),
                    None => return false,
                }
            }
            None => return false,
        };
        if next == self.unit_count {
            return false;
        }
        self.unit_count = next;
        true
    }

    fn run_total(&mut self) -> bool {
        let next = total(self.unit_price, self.unit_count);
        if next == self.total {
            return false;
        }
        self.total = next;
        true
    }

    fn run_base(&mut self, events: &[&Event]) -> bool {
        let version = self.base.version();
        let status = self.status.clone();

        for event in events {
            match event {
                Event::UploadBase(upload) => match self.importer.import_base(upload) {
                    Ok(table) => {
                        self.status.base = format!("Base cargada: {} filas", table.len());
                        self.editor.load(&mut self.base, table);
                    }
                    Err(err) => {
                        tracing::warn!(file = %upload.file_name, "base upload rejected: {err}");
                        self.status.base = err.to_string();
                    }
                },
                Event::AddProduct => {
                    let result = self.editor.add(
                        &mut self.base,
                        self.selection.code(),
                        self.unit_price,
                        self.unit_count,
                    );
                    self.report_update(result);
                }
                Event::ConfirmEdit => {
                    let Some(draft) = self.modals.state().edit.draft() else {
                        tracing::debug!("edit confirmed with the dialog closed");
                        continue;
                    };
                    let result = match self.base_selection.as_deref() {
                        Some(code) => self.editor.update(
                            &mut self.base,
                            Some(code),
                            code,
                            draft.unit_price,
                            draft.unit_count,
                        ),
                        None => Err(no_row_selected()),
                    };
                    self.report_update(result);
                }
                Event::ConfirmDelete => {
                    if !self.modals.state().delete.is_open() {
                        tracing::debug!("delete confirmed with the dialog closed");
                        continue;
                    }
                    let result = match self.base_selection.as_deref() {
                        Some(code) => self.editor.delete(&mut self.base, Some(code), code),
                        None => Err(no_row_selected()),
                    };
                    self.report_update(result);
                }
                _ => {}
            }
        }

        self.base.version() != version || self.status != status
    }

    fn report_update(&mut self, result: Result<(), PriceBaseError>) {
        self.status.update = match result {
            Ok(()) => BASE_UPDATED_MESSAGE.to_string(),
            Err(err) => {
                tracing::warn!("base change rejected: {err}");
                err.to_string()
            }
        };
    }

    /// Follows base grid clicks and drops a selection whose row is gone.
    fn run_base_selection(&mut self, events: &[&Event], base_changed: bool) -> bool {
        let before = self.base_selection.clone();
        if let Some(code) = events.iter().rev().find_map(|event| match event {
            Event::BaseRowSelected(code) => Some(code.clone()),
            _ => None,
        }) {
            self.base_selection = code;
        }
        if base_changed && selected_row(&self.base, self.base_selection.as_deref()).is_none() {
            self.base_selection = None;
        }
        self.base_selection != before
    }

    fn run_edit_dialog(&mut self, events: &[&Event]) -> bool {
        let before = *self.modals.state();
        for event in events {
            match event {
                Event::OpenEdit => {
                    let row = selected_row(&self.base, self.base_selection.as_deref());
                    self.modals.open_edit(row);
                }
                Event::EditUnitPriceChanged(value) => {
                    self.modals.stage_unit_price(*value);
                }
                Event::EditUnitCountChanged(value) => {
                    self.modals.stage_unit_count(*value);
                }
                Event::ConfirmEdit | Event::CloseEdit => {
                    self.modals.close_edit();
                }
                _ => {}
            }
        }
        *self.modals.state() != before
    }

    fn run_delete_dialog(&mut self, events: &[&Event]) -> bool {
        let before = *self.modals.state();
        for event in events {
            match event {
                Event::OpenDelete => {
                    let row = selected_row(&self.base, self.base_selection.as_deref());
                    self.modals.open_delete(row);
                }
                Event::ConfirmDelete | Event::CancelDelete => {
                    self.modals.close_delete();
                }
                _ => {}
            }
        }
        *self.modals.state() != before
    }

    fn run_downloads(&mut self, events: &[&Event], downloads: &mut Vec<Download>) -> bool {
        let period = chrono::Local::now().format("%Y-%m").to_string();
        let mut changed = false;
        for event in events {
            let format = match event {
                Event::ExportSpreadsheet => ExportFormat::Spreadsheet,
                Event::ExportCsv => ExportFormat::DelimitedText,
                _ => continue,
            };
            match self.exporter.export(format, self.base.get(), &period) {
                Ok(Some(download)) => {
                    tracing::info!(file = %download.file_name, "export ready");
                    downloads.push(download);
                    changed = true;
                }
                Ok(None) => tracing::debug!(?format, "nothing to export"),
                Err(err) => {
                    tracing::warn!(?format, "export failed: {err}");
                    self.status.update = err.to_string();
                    changed = true;
                }
            }
        }
        changed
    }
}

fn no_row_selected() -> PriceBaseError {
    PriceBaseError::Validation("seleccione una fila de la base".to_string())
}
