use std::path::Path;

use crate::domain::entities::table::{
    pad_establishment_code, BaseColumn, BaseRecord, BaseTable, CatalogTable, TabularData,
    BOX_PRICE_COLUMN, ESTABLISHMENT_COLUMN, MISSING_ESTABLISHMENT_CODE, PRODUCT_COLUMN,
    UNIT_PRICE_COLUMN,
};
use crate::domain::pricing::parse_number;
use crate::errors::{PriceBaseError, Result};
use crate::infra::import::csv::decode_csv;
use crate::infra::import::xlsx::decode_workbook;

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const OLE_SIGNATURE: &[u8] = b"\xD0\xCF\x11\xE0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Catalog,
    Base,
}

/// One uploaded file, as handed over by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Workbook,
    Csv,
}

impl UploadFormat {
    /// Goes by extension first, then by the container signature.
    pub fn detect(upload: &Upload) -> Self {
        let ext = Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => UploadFormat::Csv,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => UploadFormat::Workbook,
            _ if upload.bytes.starts_with(ZIP_SIGNATURE)
                || upload.bytes.starts_with(OLE_SIGNATURE) =>
            {
                UploadFormat::Workbook
            }
            _ => UploadFormat::Csv,
        }
    }
}

/// Decodes uploads into the catalog and base tables.
pub struct ImportService {
    catalog_header_offset: usize,
}

impl ImportService {
    pub fn new(catalog_header_offset: usize) -> Self {
        Self {
            catalog_header_offset,
        }
    }

    pub fn decode(&self, upload: &Upload, header_row: usize) -> Result<TabularData> {
        let decoded = match UploadFormat::detect(upload) {
            UploadFormat::Workbook => decode_workbook(&upload.bytes, header_row),
            UploadFormat::Csv => decode_csv(&upload.bytes, header_row),
        };
        decoded.map_err(|err| {
            PriceBaseError::format(err.context(format!("no se pudo leer {}", upload.file_name)))
        })
    }

    pub fn import_catalog(&self, upload: &Upload) -> Result<CatalogTable> {
        let data = self.decode(upload, self.catalog_header_offset)?;
        let catalog = CatalogTable::try_from(data)?;
        tracing::info!(
            file = %upload.file_name,
            rows = catalog.len(),
            "catalog decoded"
        );
        Ok(catalog)
    }

    pub fn import_base(&self, upload: &Upload) -> Result<BaseTable> {
        let data = self.decode(upload, 0)?;
        let base = base_from_tabular(data)?;
        tracing::info!(file = %upload.file_name, rows = base.len(), "base decoded");
        Ok(base)
    }
}

/// Maps the recognized base columns and keeps the rest as extra columns.
/// A missing `CodEstab` column is appended and filled with `0000000`; missing
/// price columns are appended and filled with zero.
pub fn base_from_tabular(data: TabularData) -> Result<BaseTable> {
    let mut layout = Vec::with_capacity(data.columns.len());
    let mut extra_columns = Vec::new();
    let mut sources: Vec<(BaseColumn, usize)> = Vec::new();

    for (idx, name) in data.columns.iter().enumerate() {
        let known = match name.as_str() {
            ESTABLISHMENT_COLUMN => Some(BaseColumn::Establishment),
            PRODUCT_COLUMN => Some(BaseColumn::Product),
            UNIT_PRICE_COLUMN => Some(BaseColumn::UnitPrice),
            BOX_PRICE_COLUMN => Some(BaseColumn::BoxPrice),
            _ => None,
        };
        let column = match known {
            Some(column) if !layout.contains(&column) => column,
            _ => {
                extra_columns.push(name.clone());
                BaseColumn::Extra(extra_columns.len() - 1)
            }
        };
        layout.push(column);
        sources.push((column, idx));
    }

    if !layout.contains(&BaseColumn::Product) {
        return Err(PriceBaseError::Format(format!(
            "falta la columna '{PRODUCT_COLUMN}'"
        )));
    }
    for required in [
        BaseColumn::UnitPrice,
        BaseColumn::BoxPrice,
        BaseColumn::Establishment,
    ] {
        if !layout.contains(&required) {
            layout.push(required);
        }
    }

    let source_of = |column: BaseColumn| {
        sources
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, idx)| *idx)
    };
    let establishment_idx = source_of(BaseColumn::Establishment);
    let product_idx = source_of(BaseColumn::Product);
    let unit_idx = source_of(BaseColumn::UnitPrice);
    let box_idx = source_of(BaseColumn::BoxPrice);
    let extra_idx: Vec<usize> = (0..extra_columns.len())
        .filter_map(|n| source_of(BaseColumn::Extra(n)))
        .collect();

    let cell = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i)).map(|v| v.trim().to_string()).unwrap_or_default()
    };

    let mut rows = Vec::with_capacity(data.rows.len());
    for (row_no, row) in data.rows.iter().enumerate() {
        let line = row_no + 2;
        let product_code = cell(row, product_idx);
        if product_code.is_empty() {
            tracing::warn!(line, "skipping base row without product code");
            continue;
        }
        let establishment_code = match establishment_idx {
            Some(_) => pad_establishment_code(&cell(row, establishment_idx)),
            None => MISSING_ESTABLISHMENT_CODE.to_string(),
        };
        rows.push(BaseRecord {
            establishment_code,
            product_code,
            unit_price: price_cell(&cell(row, unit_idx), UNIT_PRICE_COLUMN, line)?,
            box_price: price_cell(&cell(row, box_idx), BOX_PRICE_COLUMN, line)?,
            extra: extra_idx.iter().map(|idx| cell(row, Some(*idx))).collect(),
        });
    }

    Ok(BaseTable::new(layout, extra_columns, rows))
}

fn price_cell(text: &str, column: &str, line: usize) -> Result<f64> {
    if text.is_empty() {
        return Ok(0.0);
    }
    match parse_number(text) {
        Some(value) if value >= 0.0 => Ok(value),
        _ => Err(PriceBaseError::Format(format!(
            "fila {line}: '{column}' no es un precio válido ({text})"
        ))),
    }
}
