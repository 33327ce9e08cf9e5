use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::domain::entities::table::TabularData;
use crate::infra::import::rows_to_tabular;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Reads the first sheet of a workbook. `header_row` counts from the top of
/// the sheet, not from the first used cell.
pub fn decode_workbook(bytes: &[u8], header_row: usize) -> Result<TabularData> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .context("failed to open workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no sheets")?
        .context("failed to read first sheet")?;

    let first_used_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let skip = header_row.saturating_sub(first_used_row);

    let rows = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect::<Vec<_>>());

    rows_to_tabular(rows, skip).context("failed to locate sheet header")
}
