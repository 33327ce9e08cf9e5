pub mod csv;
pub mod xlsx;

use anyhow::Result;

use crate::domain::entities::table::TabularData;

/// Turns decoded sheet rows into a header plus data rows. `header_row`
/// rows are dropped first; blank rows below the header are skipped and
/// every row is padded or cut to the header width.
pub(crate) fn rows_to_tabular<I>(rows: I, header_row: usize) -> Result<TabularData>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut rows = rows.into_iter().skip(header_row);
    let Some(header) = rows.next() else {
        anyhow::bail!("header row {} not found", header_row + 1)
    };
    let columns: Vec<String> = header.iter().map(|name| name.trim().to_string()).collect();
    if columns.iter().all(|name| name.is_empty()) {
        anyhow::bail!("header row {} is empty", header_row + 1)
    }

    let width = columns.len();
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect();

    Ok(TabularData { columns, rows })
}
