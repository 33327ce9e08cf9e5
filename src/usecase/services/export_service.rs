use crate::domain::entities::table::BaseTable;
use crate::errors::{PriceBaseError, Result};
use crate::infra::export::csv::encode_base_csv;
use crate::infra::export::xlsx::encode_base_workbook;
use crate::usecase::ports::download::{Download, DownloadSink};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    DelimitedText,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::DelimitedText => "csv",
        }
    }

    fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => XLSX_MIME,
            ExportFormat::DelimitedText => CSV_MIME,
        }
    }
}

/// Serializes the base table. An absent or empty table is "nothing to
/// export" (`Ok(None)`), not an error.
pub struct ExportService {
    sheet_name: String,
    column_width: f64,
    csv_bom: bool,
}

impl ExportService {
    pub fn new(sheet_name: impl Into<String>, column_width: f64, csv_bom: bool) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            column_width,
            csv_bom,
        }
    }

    pub fn to_spreadsheet(&self, table: Option<&BaseTable>) -> Result<Option<Vec<u8>>> {
        let Some(table) = table.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        encode_base_workbook(table, &self.sheet_name, self.column_width)
            .map(Some)
            .map_err(PriceBaseError::export)
    }

    pub fn to_delimited_text(&self, table: Option<&BaseTable>) -> Result<Option<Vec<u8>>> {
        let Some(table) = table.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        encode_base_csv(table, self.csv_bom)
            .map(Some)
            .map_err(PriceBaseError::export)
    }

    /// Builds the download for `format`, named `<sheet>_<period>.<ext>`.
    pub fn export(
        &self,
        format: ExportFormat,
        table: Option<&BaseTable>,
        period: &str,
    ) -> Result<Option<Download>> {
        let bytes = match format {
            ExportFormat::Spreadsheet => self.to_spreadsheet(table)?,
            ExportFormat::DelimitedText => self.to_delimited_text(table)?,
        };
        Ok(bytes.map(|bytes| Download {
            file_name: format!(
                "{}_{}.{}",
                self.sheet_name.to_lowercase(),
                period,
                format.extension()
            ),
            mime_type: format.mime_type(),
            bytes,
        }))
    }

    pub fn deliver(&self, sink: &dyn DownloadSink, download: &Download) -> Result<String> {
        let saved = sink
            .deliver(download)
            .map_err(PriceBaseError::export)?;
        Ok(match saved {
            Some(path) => {
                tracing::info!(path = %path.display(), bytes = download.bytes.len(), "export saved");
                format!("Exportado a {}", path.display())
            }
            None => "Exportación cancelada".to_string(),
        })
    }
}
