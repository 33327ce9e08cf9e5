use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::domain::pricing::format_number;
use crate::usecase::graph::{Cell, CycleOutcome, Event, Trigger};
use crate::usecase::ports::download::{Download, DownloadSink};
use crate::usecase::session::{Session, StatusBoard};

/// One rendered grid row.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub cells: Vec<String>,
    pub code: Option<String>,
    pub selected: bool,
}

/// Owned snapshot of what the window shows, taken once per render.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub catalog_columns: Vec<String>,
    pub catalog_rows: Vec<GridRow>,
    pub dropdown_options: Vec<String>,
    pub selected_code: Option<String>,
    pub selection_status: String,
    pub total: String,
    pub base_columns: Vec<String>,
    pub base_rows: Vec<GridRow>,
    pub base_selection: Option<String>,
    pub edit_open: bool,
    pub delete_open: bool,
    pub status: StatusBoard,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        let selected_code = session.selection().code().map(str::to_string);

        let (catalog_columns, catalog_rows) = match session.catalog() {
            Some(catalog) => (
                catalog.columns().to_vec(),
                catalog
                    .rows()
                    .iter()
                    .map(|row| {
                        let code = catalog.code_of(row);
                        GridRow {
                            selected: code.is_some() && code == selected_code,
                            cells: row.clone(),
                            code,
                        }
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let base_selection = session.base_selection().map(str::to_string);
        let (base_columns, base_rows) = match session.base() {
            Some(base) => (
                base.columns(),
                base.rows()
                    .iter()
                    .map(|record| GridRow {
                        cells: base.row_values(record),
                        selected: base_selection.as_deref() == Some(record.product_code.as_str()),
                        code: Some(record.product_code.clone()),
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            catalog_columns,
            catalog_rows,
            dropdown_options: session.dropdown_options(),
            selected_code,
            selection_status: session.selection_status().to_string(),
            total: session.total().display(),
            base_columns,
            base_rows,
            base_selection,
            edit_open: session.dialogs().edit.is_open(),
            delete_open: session.dialogs().delete.is_open(),
            status: session.status().clone(),
        }
    }

    pub fn can_edit_row(&self) -> bool {
        self.base_selection.is_some()
    }
}

pub fn number_text(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

/// Front-end handles: the session plus the raw text of each numeric input,
/// kept apart so a half-typed number is not reformatted under the cursor.
#[derive(Clone, Copy)]
pub struct AppState {
    pub session: Signal<Session>,
    pub unit_price_text: Signal<String>,
    pub unit_count_text: Signal<String>,
    pub edit_price_text: Signal<String>,
    pub edit_count_text: Signal<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: use_signal(move || Session::new(config)),
            unit_price_text: use_signal(String::new),
            unit_count_text: use_signal(String::new),
            edit_price_text: use_signal(String::new),
            edit_count_text: use_signal(String::new),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView::of(&self.session.read())
    }

    /// Runs one update cycle and mirrors derived values back into the inputs
    /// the user did not type into.
    pub fn apply(&mut self, events: Vec<Event>) -> CycleOutcome {
        let typed_count = events
            .iter()
            .any(|event| event.trigger() == Trigger::UnitCount);
        let opened_edit = events
            .iter()
            .any(|event| event.trigger() == Trigger::OpenEdit);

        let outcome = self.session.write().dispatch_cycle(events);
        let session = self.session.read();

        if outcome.touched(Cell::UnitCount) && !typed_count {
            self.unit_count_text.set(number_text(session.unit_count()));
        }
        if outcome.touched(Cell::EditDialog) {
            match session.dialogs().edit.draft() {
                Some(draft) if opened_edit => {
                    self.edit_price_text.set(number_text(draft.unit_price));
                    self.edit_count_text.set(number_text(draft.unit_count));
                }
                Some(_) => {}
                None => {
                    self.edit_price_text.set(String::new());
                    self.edit_count_text.set(String::new());
                }
            }
        }
        outcome
    }

    pub fn deliver_all(&mut self, downloads: &[Download], sink: &dyn DownloadSink) {
        for download in downloads {
            self.session.write().deliver(sink, download);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::services::import_service::Upload;

    fn loaded_session() -> Session {
        let mut session = Session::new(AppConfig {
            catalog_header_offset: 0,
            ..AppConfig::default()
        });
        session.dispatch(Event::UploadCatalog(Upload::new(
            "catalogo.csv",
            b"Cod_Prod,Nombre,Fracci\xc3\xb3n\nA1,Aspirina,10\nB2,Ibuprofeno,20\n".to_vec(),
        )));
        session
    }

    #[test]
    fn number_text_drops_trailing_zeros() {
        assert_eq!(number_text(None), "");
        assert_eq!(number_text(Some(20.0)), "20");
    }

    #[test]
    fn view_marks_selected_catalog_row() {
        let mut session = loaded_session();
        session.dispatch(Event::DropdownChanged(Some("B2".to_string())));

        let view = SessionView::of(&session);

        assert_eq!(view.catalog_columns, vec!["Cod_Prod", "Nombre", "Fracción"]);
        let selected: Vec<bool> = view.catalog_rows.iter().map(|row| row.selected).collect();
        assert_eq!(selected, vec![false, true]);
        assert_eq!(view.dropdown_options, vec!["A1", "B2"]);
        assert_eq!(view.selection_status, "Seleccionaste: B2");
    }

    #[test]
    fn empty_session_view_has_no_grids() {
        let view = SessionView::of(&Session::new(AppConfig::default()));

        assert!(view.catalog_rows.is_empty());
        assert!(view.base_rows.is_empty());
        assert!(!view.can_edit_row());
        assert!(!view.edit_open);
    }
}
