use anyhow::{Context, Result};

use crate::domain::entities::table::TabularData;
use crate::infra::import::rows_to_tabular;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes CSV text. Records keep their source line, so `header_row` counts
/// lines from the top of the file even when some of them are blank.
pub fn decode_csv(bytes: &[u8], header_row: usize) -> Result<TabularData> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to parse csv record {}", idx + 1))?;
        if let Some(position) = record.position() {
            let line_idx = position.line().saturating_sub(1) as usize;
            while rows.len() < line_idx {
                rows.push(Vec::new());
            }
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    rows_to_tabular(rows, header_row).context("csv header is required")
}
