//! Snapshot normalization: raw row mappings to typed product records.
//!
//! Best-effort by policy: a missing or malformed field never fails the row,
//! it degrades to `""` (text fields) or `"0"` (numeric fields).

use catalog_model::ProductRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::rows::RawRow;

/// Default for missing text fields (code, description, unit).
pub const TEXT_DEFAULT: &str = "";
/// Default for missing numeric fields (price, stock, unit price).
pub const NUMERIC_DEFAULT: &str = "0";

/// Source column name for each product field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub price: String,
    pub stock: String,
    pub unit_price: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            code: "Código".to_string(),
            description: "Descripcion".to_string(),
            unit: "Unidad".to_string(),
            price: "Precio".to_string(),
            stock: "StActual".to_string(),
            unit_price: "Pr.Unit".to_string(),
        }
    }
}

/// Normalize every row, preserving order.
#[must_use]
pub fn normalize_rows(rows: &[RawRow], columns: &ColumnMap) -> Vec<ProductRecord> {
    rows.iter().map(|row| normalize_row(row, columns)).collect()
}

/// Normalize a single row.
#[must_use]
pub fn normalize_row(row: &RawRow, columns: &ColumnMap) -> ProductRecord {
    ProductRecord {
        code: field_text(row, &columns.code, TEXT_DEFAULT),
        description: field_text(row, &columns.description, TEXT_DEFAULT),
        unit: field_text(row, &columns.unit, TEXT_DEFAULT),
        price: field_text(row, &columns.price, NUMERIC_DEFAULT),
        stock: field_text(row, &columns.stock, NUMERIC_DEFAULT),
        unit_price: field_text(row, &columns.unit_price, NUMERIC_DEFAULT),
    }
}

/// Look up `column` (exact, then ASCII case-insensitive) and render it as
/// trimmed text, or `default` when absent or empty.
fn field_text(row: &RawRow, column: &str, default: &str) -> String {
    let value = row.get(column).or_else(|| {
        row.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    });
    let text = match value {
        None | Some(Value::Null) => return default.to_string(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number_text(number),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

/// Integral values render without a fractional part (`1001.0` → `1001`).
fn number_text(number: &Number) -> String {
    if let Some(value) = number.as_i64() {
        value.to_string()
    } else if let Some(value) = number.as_u64() {
        value.to_string()
    } else {
        number
            .as_f64()
            .map_or_else(|| number.to_string(), |value| value.to_string())
    }
}
