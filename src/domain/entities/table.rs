use std::collections::HashSet;

use crate::domain::pricing::format_price;
use crate::errors::{PriceBaseError, Result};

pub const CATALOG_CODE_COLUMN: &str = "Cod_Prod";
pub const CATALOG_FRACTION_COLUMN: &str = "Fracción";

pub const ESTABLISHMENT_COLUMN: &str = "CodEstab";
pub const PRODUCT_COLUMN: &str = "CodProd";
pub const BOX_PRICE_COLUMN: &str = "Precio 1";
pub const UNIT_PRICE_COLUMN: &str = "Precio 2";

pub const ESTABLISHMENT_CODE_WIDTH: usize = 7;
pub const MISSING_ESTABLISHMENT_CODE: &str = "0000000";

/// Raw decoded sheet: a header row plus string cells, before any
/// table-specific interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.trim() == name)
    }
}

/// The uploaded product catalog. Read-only after import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
    data: TabularData,
    code_idx: usize,
}

impl TryFrom<TabularData> for CatalogTable {
    type Error = PriceBaseError;

    fn try_from(data: TabularData) -> Result<Self> {
        let code_idx = data.column_index(CATALOG_CODE_COLUMN).ok_or_else(|| {
            PriceBaseError::Format(format!("falta la columna '{CATALOG_CODE_COLUMN}'"))
        })?;
        Ok(Self { data, code_idx })
    }
}

impl CatalogTable {
    pub fn columns(&self) -> &[String] {
        &self.data.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.data.rows
    }

    pub fn len(&self) -> usize {
        self.data.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.rows.is_empty()
    }

    pub fn code_of(&self, row: &[String]) -> Option<String> {
        row.get(self.code_idx)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
    }

    pub fn find(&self, code: &str) -> Option<&[String]> {
        self.data
            .rows
            .iter()
            .find(|row| row.get(self.code_idx).map(|v| v.trim()) == Some(code))
            .map(Vec::as_slice)
    }

    pub fn value<'a>(&self, row: &'a [String], column: &str) -> Option<&'a str> {
        self.data
            .column_index(column)
            .and_then(|idx| row.get(idx))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Unique product codes in first-seen order, for the manual dropdown.
    pub fn product_codes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.data
            .rows
            .iter()
            .filter_map(|row| self.code_of(row))
            .filter(|code| seen.insert(code.clone()))
            .collect()
    }
}

/// One priced product row of the monthly base.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseRecord {
    pub establishment_code: String,
    pub product_code: String,
    pub unit_price: f64,
    pub box_price: f64,
    /// Values of the non-recognized columns, aligned with the table's extra columns.
    pub extra: Vec<String>,
}

impl BaseRecord {
    /// Units per box recovered from the stored prices. `None` when the unit
    /// price is zero, since the count was never stored.
    pub fn unit_count(&self) -> Option<f64> {
        if self.unit_price == 0.0 {
            return None;
        }
        Some((self.box_price / self.unit_price).round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseColumn {
    Establishment,
    Product,
    UnitPrice,
    BoxPrice,
    Extra(usize),
}

/// The monthly price base. Column order follows the uploaded file; a table
/// created from scratch uses `CodEstab, CodProd, Precio 2, Precio 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseTable {
    layout: Vec<BaseColumn>,
    extra_columns: Vec<String>,
    rows: Vec<BaseRecord>,
}

impl Default for BaseTable {
    fn default() -> Self {
        Self {
            layout: vec![
                BaseColumn::Establishment,
                BaseColumn::Product,
                BaseColumn::UnitPrice,
                BaseColumn::BoxPrice,
            ],
            extra_columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl BaseTable {
    pub fn new(layout: Vec<BaseColumn>, extra_columns: Vec<String>, rows: Vec<BaseRecord>) -> Self {
        Self {
            layout,
            extra_columns,
            rows,
        }
    }

    pub fn layout(&self) -> &[BaseColumn] {
        &self.layout
    }

    pub fn columns(&self) -> Vec<String> {
        self.layout
            .iter()
            .map(|column| match column {
                BaseColumn::Establishment => ESTABLISHMENT_COLUMN.to_string(),
                BaseColumn::Product => PRODUCT_COLUMN.to_string(),
                BaseColumn::UnitPrice => UNIT_PRICE_COLUMN.to_string(),
                BaseColumn::BoxPrice => BOX_PRICE_COLUMN.to_string(),
                BaseColumn::Extra(idx) => self.extra_columns.get(*idx).cloned().unwrap_or_default(),
            })
            .collect()
    }

    pub fn rows(&self) -> &[BaseRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    pub fn find(&self, code: &str) -> Option<&BaseRecord> {
        self.rows.iter().find(|row| row.product_code == code)
    }

    pub fn find_mut(&mut self, code: &str) -> Option<&mut BaseRecord> {
        self.rows.iter_mut().find(|row| row.product_code == code)
    }

    pub fn push(&mut self, record: BaseRecord) {
        self.rows.push(record);
    }

    /// Removes the row for `code`, returning it when it existed.
    pub fn remove(&mut self, code: &str) -> Option<BaseRecord> {
        let idx = self.rows.iter().position(|row| row.product_code == code)?;
        Some(self.rows.remove(idx))
    }

    /// Empty values for the extra columns of a freshly added row.
    pub fn blank_extra(&self) -> Vec<String> {
        vec![String::new(); self.extra_columns.len()]
    }

    /// Cell text for one row in column order, prices with two decimals.
    pub fn row_values(&self, record: &BaseRecord) -> Vec<String> {
        self.layout
            .iter()
            .map(|column| match column {
                BaseColumn::Establishment => record.establishment_code.clone(),
                BaseColumn::Product => record.product_code.clone(),
                BaseColumn::UnitPrice => format_price(record.unit_price),
                BaseColumn::BoxPrice => format_price(record.box_price),
                BaseColumn::Extra(idx) => record.extra.get(*idx).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Fills, pads and stamps the establishment code on every row.
    pub fn normalize_establishment(&mut self, default_code: &str) {
        let code = pad_establishment_code(default_code);
        for row in &mut self.rows {
            row.establishment_code = code.clone();
        }
    }
}

/// Left-pads a code to seven characters. Numeric text such as `21870.0`
/// loses its fractional part first; blanks become `0000000`.
pub fn pad_establishment_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return MISSING_ESTABLISHMENT_CODE.to_string();
    }
    let digits = match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value >= 0.0 => {
            format!("{}", value as u64)
        }
        _ => trimmed.to_string(),
    };
    format!("{digits:0>width$}", width = ESTABLISHMENT_CODE_WIDTH)
}
