use anyhow::{anyhow, Result};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::entities::table::{BaseColumn, BaseTable};

/// Writes the base table as a single-sheet workbook. Product codes are text
/// cells so leading zeros survive; both prices use a two-decimal format.
pub fn encode_base_workbook(table: &BaseTable, sheet_name: &str, column_width: f64) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let text_format = Format::new().set_num_format("@");
    let price_format = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| anyhow!(format!("sheet name error: {}", xlsx_err(e))))?;

    for (col, header) in table.columns().iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, column_width)
            .map_err(|e| anyhow!(xlsx_err(e)))?;
        worksheet
            .write_string_with_format(0, col, header.as_str(), &header_format)
            .map_err(|e| anyhow!(xlsx_err(e)))?;
    }

    for (idx, record) in table.rows().iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, column) in table.layout().iter().enumerate() {
            let col = col as u16;
            match column {
                BaseColumn::Product => {
                    worksheet
                        .write_string_with_format(row, col, record.product_code.as_str(), &text_format)
                        .map_err(|e| anyhow!(xlsx_err(e)))?;
                }
                BaseColumn::UnitPrice => {
                    worksheet
                        .write_number_with_format(row, col, record.unit_price, &price_format)
                        .map_err(|e| anyhow!(xlsx_err(e)))?;
                }
                BaseColumn::BoxPrice => {
                    worksheet
                        .write_number_with_format(row, col, record.box_price, &price_format)
                        .map_err(|e| anyhow!(xlsx_err(e)))?;
                }
                BaseColumn::Establishment => {
                    worksheet
                        .write_string(row, col, record.establishment_code.as_str())
                        .map_err(|e| anyhow!(xlsx_err(e)))?;
                }
                BaseColumn::Extra(extra_idx) => {
                    let value = record.extra.get(*extra_idx).map(String::as_str).unwrap_or("");
                    if !value.is_empty() {
                        worksheet
                            .write_string(row, col, value)
                            .map_err(|e| anyhow!(xlsx_err(e)))?;
                    }
                }
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| anyhow!(format!("serialize workbook to buffer: {}", xlsx_err(e))))
}

fn xlsx_err(err: XlsxError) -> String {
    format!("{err:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::table::BaseRecord;
    use crate::infra::import::xlsx::decode_workbook;
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;

    fn table() -> BaseTable {
        let mut table = BaseTable::default();
        table.push(BaseRecord {
            establishment_code: "0021870".to_string(),
            product_code: "00123".to_string(),
            unit_price: 12.0,
            box_price: 96.0,
            extra: Vec::new(),
        });
        table
    }

    #[test]
    fn workbook_keeps_codes_as_text_and_prices_as_numbers() {
        let bytes = encode_base_workbook(&table(), "Base", 15.0).expect("workbook should encode");

        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).expect("workbook should reopen");
        assert_eq!(workbook.sheet_names(), vec!["Base".to_string()]);
        let range = workbook
            .worksheet_range("Base")
            .expect("sheet should be readable");

        assert_eq!(range.get_value((1, 1)), Some(&Data::String("00123".to_string())));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Float(12.0)));
        assert_eq!(range.get_value((1, 3)), Some(&Data::Float(96.0)));
    }

    #[test]
    fn workbook_header_matches_table_columns() {
        let bytes = encode_base_workbook(&table(), "Base", 15.0).expect("workbook should encode");

        let data = decode_workbook(&bytes, 0).expect("workbook should decode");

        assert_eq!(data.columns, vec!["CodEstab", "CodProd", "Precio 2", "Precio 1"]);
        assert_eq!(data.rows[0][0], "0021870");
    }

    #[test]
    fn invalid_sheet_name_is_reported() {
        let result = encode_base_workbook(&table(), "bad[name]", 15.0);
        assert!(result.is_err());
    }
}
