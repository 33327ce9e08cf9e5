//! Box-price arithmetic shared by the calculator panel, the editor and the
//! edit dialog.

use crate::domain::entities::table::{CatalogTable, CATALOG_FRACTION_COLUMN};

/// What the total display shows for the current inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Total {
    WaitingForInput,
    InvalidValues,
    Value(f64),
}

impl Total {
    pub fn value(&self) -> Option<f64> {
        match self {
            Total::Value(value) => Some(*value),
            Total::WaitingForInput | Total::InvalidValues => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Total::WaitingForInput => "Ingrese precio unitario y unidades".to_string(),
            Total::InvalidValues => "Valores inválidos".to_string(),
            Total::Value(value) => format!("Total: {value:.2}"),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub fn total(unit_price: Option<f64>, unit_count: Option<f64>) -> Total {
    match (unit_price, unit_count) {
        (Some(price), Some(count)) if is_positive(price) && is_positive(count) => {
            Total::Value(round2(price * count))
        }
        (Some(_), Some(_)) => Total::InvalidValues,
        _ => Total::WaitingForInput,
    }
}

/// Unit count suggested by the catalog's `Fracción` column for the selected
/// product. `None` means "keep whatever the input holds".
pub fn autofill_unit_count(selection: Option<&str>, catalog: Option<&CatalogTable>) -> Option<f64> {
    let code = selection?;
    let catalog = catalog?;
    let row = catalog.find(code)?;
    let fraction = parse_number(catalog.value(row, CATALOG_FRACTION_COLUMN)?)?;
    Some(fraction.trunc())
}

/// Parses user or sheet text as a finite number. Blank text is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Shortest text for an input box: `8` rather than `8.000000`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}
