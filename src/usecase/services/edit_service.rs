use crate::domain::entities::store::TableStore;
use crate::domain::entities::table::{BaseRecord, BaseTable};
use crate::domain::pricing::{format_number, is_positive, round2};
use crate::errors::{PriceBaseError, Result};

/// Add, update and delete over the monthly base. Every successful write goes
/// through `TableStore::patch` and ends with the establishment code
/// re-stamped on all rows.
pub struct EditService {
    establishment_code: String,
}

impl EditService {
    pub fn new(establishment_code: impl Into<String>) -> Self {
        Self {
            establishment_code: establishment_code.into(),
        }
    }

    /// Replaces the whole base with an uploaded table.
    pub fn load(&self, base: &mut TableStore<BaseTable>, mut table: BaseTable) {
        table.normalize_establishment(&self.establishment_code);
        tracing::info!(rows = table.len(), "base replaced");
        base.replace(table);
    }

    pub fn add(
        &self,
        base: &mut TableStore<BaseTable>,
        code: Option<&str>,
        unit_price: Option<f64>,
        unit_count: Option<f64>,
    ) -> Result<()> {
        let code = code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| PriceBaseError::Validation("seleccione un producto".to_string()))?;
        let unit_price = require_positive(unit_price, "precio unitario")?;
        let unit_count = require_positive(unit_count, "unidades por caja")?;

        base.patch(BaseTable::default, |table| {
            if table.contains(code) {
                return Err(PriceBaseError::Duplicate {
                    code: code.to_string(),
                });
            }
            let record = BaseRecord {
                establishment_code: self.establishment_code.clone(),
                product_code: code.to_string(),
                unit_price,
                box_price: round2(unit_price * unit_count),
                extra: table.blank_extra(),
            };
            table.push(record);
            table.normalize_establishment(&self.establishment_code);
            Ok(())
        })
        .inspect(|_| tracing::info!(code, unit_price, unit_count, "base row added"))
    }

    /// Rewrites the prices of the selected row in place.
    pub fn update(
        &self,
        base: &mut TableStore<BaseTable>,
        selected: Option<&str>,
        code: &str,
        unit_price: Option<f64>,
        unit_count: Option<f64>,
    ) -> Result<()> {
        require_selection(selected, code)?;
        let unit_price = require_positive(unit_price, "precio unitario")?;
        let unit_count = require_positive(unit_count, "unidades por caja")?;

        base.patch(BaseTable::default, |table| {
            let row = table.find_mut(code).ok_or_else(|| PriceBaseError::NotFound {
                code: code.to_string(),
            })?;
            row.unit_price = unit_price;
            row.box_price = round2(unit_price * unit_count);
            table.normalize_establishment(&self.establishment_code);
            Ok(())
        })
        .inspect(|_| {
            tracing::info!(
                code,
                unit_price,
                unit_count = %format_number(unit_count),
                "base row updated"
            )
        })
    }

    pub fn delete(
        &self,
        base: &mut TableStore<BaseTable>,
        selected: Option<&str>,
        code: &str,
    ) -> Result<()> {
        require_selection(selected, code)?;

        base.patch(BaseTable::default, |table| {
            table.remove(code).ok_or_else(|| PriceBaseError::NotFound {
                code: code.to_string(),
            })?;
            table.normalize_establishment(&self.establishment_code);
            Ok(())
        })
        .inspect(|_| tracing::info!(code, "base row deleted"))
    }
}

fn require_positive(value: Option<f64>, label: &str) -> Result<f64> {
    match value {
        Some(value) if is_positive(value) => Ok(value),
        Some(_) => Err(PriceBaseError::Validation(format!(
            "{label} debe ser mayor que cero"
        ))),
        None => Err(PriceBaseError::Validation(format!("falta {label}"))),
    }
}

fn require_selection(selected: Option<&str>, code: &str) -> Result<()> {
    match selected {
        Some(selected) if selected == code => Ok(()),
        Some(selected) => Err(PriceBaseError::Validation(format!(
            "la fila seleccionada ({selected}) no corresponde a {code}"
        ))),
        None => Err(PriceBaseError::Validation(
            "seleccione una fila de la base".to_string(),
        )),
    }
}
