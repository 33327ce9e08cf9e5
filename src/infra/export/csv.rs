use anyhow::{anyhow, Context, Result};

use crate::domain::entities::table::BaseTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header plus one line per row, no index column.
pub fn encode_base_csv(table: &BaseTable, with_bom: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if with_bom {
        out.extend_from_slice(UTF8_BOM);
    }

    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer
        .write_record(table.columns())
        .context("failed to write csv header")?;
    for record in table.rows() {
        writer
            .write_record(table.row_values(record))
            .with_context(|| format!("failed to write csv row for {}", record.product_code))?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush csv: {}", err.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::table::BaseRecord;

    fn table() -> BaseTable {
        let mut table = BaseTable::default();
        table.push(BaseRecord {
            establishment_code: "0021870".to_string(),
            product_code: "00123".to_string(),
            unit_price: 5.0,
            box_price: 100.0,
            extra: Vec::new(),
        });
        table
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let bytes = encode_base_csv(&table(), false).expect("csv should encode");
        let text = String::from_utf8(bytes).expect("csv should be utf-8");

        assert_eq!(
            text,
            "CodEstab,CodProd,Precio 2,Precio 1\n0021870,00123,5.00,100.00\n"
        );
    }

    #[test]
    fn bom_is_prepended_on_request() {
        let bytes = encode_base_csv(&table(), true).expect("csv should encode");
        assert!(bytes.starts_with(UTF8_BOM));
    }
}
