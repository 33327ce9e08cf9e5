use crate::domain::entities::selection::{Selection, SelectionSource};
use crate::domain::entities::table::CatalogTable;

pub const NO_SELECTION_MESSAGE: &str = "Sin producto seleccionado";

/// A selection change coming from one of the two catalog surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Catalog grid row click; carries the whole row, `None` on deselect.
    Grid(Option<Vec<String>>),
    /// Manual dropdown choice; `None` when the dropdown is cleared.
    Dropdown(Option<String>),
}

/// Keeps the grid and the dropdown pointing at the same product code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionTracker {
    selection: Selection,
    status: String,
}

impl SelectionTracker {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn code(&self) -> Option<&str> {
        self.selection.code()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Applies the events of one update cycle and returns whether the
    /// canonical code changed. Within a cycle the last event of each surface
    /// counts, and a grid event beats a dropdown event.
    pub fn reconcile(&mut self, events: &[SelectionEvent], catalog: Option<&CatalogTable>) -> bool {
        let mut grid = None;
        let mut dropdown = None;
        for event in events {
            match event {
                SelectionEvent::Grid(row) => grid = Some(row),
                SelectionEvent::Dropdown(code) => dropdown = Some(code),
            }
        }

        let (source, code) = match (grid, dropdown) {
            (Some(Some(row)), _) => {
                let code = catalog.and_then(|catalog| catalog.code_of(row));
                (SelectionSource::Grid, code)
            }
            // Deselecting a grid row leaves the current choice alone.
            (Some(None), None) | (None, None) => return false,
            (Some(None), Some(code)) | (None, Some(code)) => (
                SelectionSource::Dropdown,
                code.as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            ),
        };

        let changed = self.selection.code != code;
        self.selection = Selection {
            grid_code: code.clone(),
            dropdown_code: code.clone(),
            code,
            last_source: Some(source),
        };
        debug_assert!(self.selection.surfaces_agree());
        self.status = match self.selection.code() {
            Some(code) => format!("Seleccionaste: {code}"),
            None => NO_SELECTION_MESSAGE.to_string(),
        };
        tracing::debug!(
            ?source,
            code = self.selection.code(),
            changed,
            "selection reconciled"
        );
        changed
    }
}
