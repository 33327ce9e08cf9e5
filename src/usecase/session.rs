use crate::config::AppConfig;
use crate::domain::entities::edit::DialogState;
use crate::domain::entities::selection::Selection;
use crate::domain::entities::store::TableStore;
use crate::domain::entities::table::{BaseRecord, BaseTable, CatalogTable};
use crate::domain::pricing::Total;
use crate::usecase::ports::download::{Download, DownloadSink};
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::modal_service::ModalController;
use crate::usecase::services::selection_service::SelectionTracker;

/// Status lines shown next to the upload slots and the editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBoard {
    pub catalog: String,
    pub base: String,
    pub update: String,
}

/// All state of one editing session. Outside the crate, state only changes
/// through `Session::dispatch` and `Session::deliver`.
pub struct Session {
    pub(crate) config: AppConfig,
    pub(crate) importer: ImportService,
    pub(crate) editor: EditService,
    pub(crate) exporter: ExportService,
    pub(crate) catalog: TableStore<CatalogTable>,
    pub(crate) base: TableStore<BaseTable>,
    pub(crate) selection: SelectionTracker,
    pub(crate) unit_price: Option<f64>,
    pub(crate) unit_count: Option<f64>,
    pub(crate) total: Total,
    pub(crate) base_selection: Option<String>,
    pub(crate) modals: ModalController,
    pub(crate) status: StatusBoard,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            importer: ImportService::new(config.catalog_header_offset),
            editor: EditService::new(config.establishment_code.clone()),
            exporter: ExportService::new(
                config.export_sheet_name.clone(),
                config.export_column_width,
                config.csv_bom,
            ),
            catalog: TableStore::new(),
            base: TableStore::new(),
            selection: SelectionTracker::default(),
            unit_price: None,
            unit_count: None,
            total: Total::WaitingForInput,
            base_selection: None,
            modals: ModalController::default(),
            status: StatusBoard::default(),
            config,
        }
    }

    /// Drops both tables and every input, keeping the configuration.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        *self = Session::new(self.config.clone());
    }

    /// Hands a finished export to `sink` and reports the result on the
    /// update status line.
    pub fn deliver(&mut self, sink: &dyn DownloadSink, download: &Download) {
        self.status.update = match self.exporter.deliver(sink, download) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(file = %download.file_name, "export not saved: {err}");
                err.to_string()
            }
        };
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&CatalogTable> {
        self.catalog.get()
    }

    pub fn catalog_version(&self) -> u64 {
        self.catalog.version()
    }

    pub fn base(&self) -> Option<&BaseTable> {
        self.base.get()
    }

    pub fn base_version(&self) -> u64 {
        self.base.version()
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn selection_status(&self) -> &str {
        self.selection.status()
    }

    /// Product codes offered by the manual dropdown.
    pub fn dropdown_options(&self) -> Vec<String> {
        self.catalog
            .get()
            .map(CatalogTable::product_codes)
            .unwrap_or_default()
    }

    pub fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }

    pub fn unit_count(&self) -> Option<f64> {
        self.unit_count
    }

    pub fn total(&self) -> Total {
        self.total
    }

    pub fn base_selection(&self) -> Option<&str> {
        self.base_selection.as_deref()
    }

    pub fn dialogs(&self) -> &DialogState {
        self.modals.state()
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Base rows rendered as cell text, in column order.
    pub fn base_rows(&self) -> Vec<Vec<String>> {
        self.base
            .get()
            .map(|table| table.rows().iter().map(|row| table.row_values(row)).collect())
            .unwrap_or_default()
    }
}

pub(crate) fn selected_row<'a>(
    base: &'a TableStore<BaseTable>,
    code: Option<&str>,
) -> Option<&'a BaseRecord> {
    base.get().zip(code).and_then(|(table, code)| table.find(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_empty() {
        let session = Session::new(AppConfig::default());

        assert!(session.catalog().is_none());
        assert!(session.base().is_none());
        assert!(session.dropdown_options().is_empty());
        assert!(session.base_rows().is_empty());
        assert_eq!(session.total(), Total::WaitingForInput);
        assert_eq!(session.dialogs(), &DialogState::default());
    }
}
