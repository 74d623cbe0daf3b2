use std::fmt;

use serde::{Deserialize, Serialize};

/// A single catalog row after normalization.
///
/// All fields are plain strings: the front-end renders them verbatim and the
/// change detector parses `price` on demand.
///
/// Field names on the wire are the ones the catalog page reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "precio")]
    pub price: String,
    pub stock: String,
    #[serde(rename = "precio_unit")]
    pub unit_price: String,
}

impl ProductRecord {
    /// Composite identity of this record.
    #[must_use]
    pub fn key(&self) -> ProductKey {
        ProductKey::new(&self.code, &self.unit)
    }

    /// Price as a decimal number, if it parses to a finite value.
    #[must_use]
    pub fn parsed_price(&self) -> Option<f64> {
        self.price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }
}

/// `(code, unit)` pair identifying a catalog entry.
///
/// The same product code may be sold under several units ("UN", "DOC");
/// each unit is a distinct entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductKey {
    pub code: String,
    pub unit: String,
}

impl ProductKey {
    pub fn new(code: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            unit: unit.into(),
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.code, self.unit)
    }
}
