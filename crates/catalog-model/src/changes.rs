use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum absolute price difference that counts as a change.
///
/// Strictly greater than: 10.00 → 10.01 is not reported.
pub const PRICE_EPSILON: f64 = 0.01;

/// Why a key shows up as new.
///
/// Serialized as `tipo_cambio`; the front-end badges `nueva_unidad` entries
/// as an added unit of an existing product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The code did not exist under any unit before.
    #[serde(rename = "producto_nuevo")]
    NewProduct,
    /// The code existed, but not with this unit.
    #[serde(rename = "nueva_unidad")]
    NewVariant,
}

impl ChangeKind {
    #[must_use]
    pub const fn from_is_new_product(is_new_product: bool) -> Self {
        if is_new_product {
            Self::NewProduct
        } else {
            Self::NewVariant
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewProduct => "producto_nuevo",
            Self::NewVariant => "nueva_unidad",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized as `tipo`: `subio` or `bajo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceDirection {
    #[serde(rename = "subio")]
    Up,
    #[serde(rename = "bajo")]
    Down,
}

impl PriceDirection {
    #[must_use]
    pub fn between(old: f64, new: f64) -> Self {
        if new > old { Self::Up } else { Self::Down }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "subio",
            Self::Down => "bajo",
        }
    }
}

impl fmt::Display for PriceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key present in the current snapshot but not in the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: String,
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "es_producto_nuevo")]
    pub is_new_product: bool,
    #[serde(rename = "tipo_cambio")]
    pub kind: ChangeKind,
}

/// A key whose price moved by more than [`PRICE_EPSILON`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio_antiguo")]
    pub price_old: String,
    #[serde(rename = "precio_nuevo")]
    pub price_new: String,
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "tipo")]
    pub direction: PriceDirection,
}

/// Differences between two snapshots. Removed keys are not represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(rename = "nuevos")]
    pub new_items: Vec<NewItem>,
    #[serde(rename = "precios")]
    pub price_changes: Vec<PriceChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty() && self.price_changes.is_empty()
    }

    /// `None` when nothing changed, so an empty set is never published.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    #[must_use]
    pub fn new_product_count(&self) -> usize {
        self.new_items
            .iter()
            .filter(|item| item.kind == ChangeKind::NewProduct)
            .count()
    }

    #[must_use]
    pub fn new_variant_count(&self) -> usize {
        self.new_items
            .iter()
            .filter(|item| item.kind == ChangeKind::NewVariant)
            .count()
    }

    #[must_use]
    pub fn price_count(&self, direction: PriceDirection) -> usize {
        self.price_changes
            .iter()
            .filter(|change| change.direction == direction)
            .count()
    }
}
