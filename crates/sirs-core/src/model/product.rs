// ── Catalog domain types ──

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::entity_id::{Entity, EntityId};

/// Products with fewer units than this (but more than zero) are low on stock.
pub const LOW_STOCK_THRESHOLD: f64 = 10.0;

/// Parse a numeric field transmitted as text.
///
/// Empty, malformed and non-finite values read as `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Stock classification of a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
    /// Negative counts (data entry errors) fall in neither bucket.
    Negative,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub parent: Option<EntityId>,
    pub product_count: u64,
}

impl Entity for Category {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A product's category reference, resolved to a display name when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    pub id: EntityId,
    pub name: Option<String>,
}

/// The canonical Product type.
///
/// `price` and `stock` keep the text the backend sent; the numeric
/// accessors interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: Option<CategoryLink>,

    // Catalog extras
    pub model_code: Option<String>,
    pub warranty_code: Option<String>,
    pub price_list: Option<String>,
    pub price_cash: Option<String>,
    pub campaign_tag: Option<String>,
    pub image: Option<String>,
}

impl Product {
    /// Price as a number (`0.0` when unparsable).
    pub fn price_value(&self) -> f64 {
        parse_number(&self.price)
    }

    /// Stock count as a number (`0.0` when unparsable).
    pub fn stock_value(&self) -> f64 {
        parse_number(&self.stock)
    }

    /// Display name of the referenced category, `""` when unknown.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("")
    }

    pub fn category_id(&self) -> Option<EntityId> {
        self.category.as_ref().map(|c| c.id)
    }

    pub fn stock_level(&self) -> StockLevel {
        let stock = self.stock_value();
        match stock.partial_cmp(&0.0) {
            Some(Ordering::Equal) | None => StockLevel::OutOfStock,
            Some(Ordering::Less) => StockLevel::Negative,
            Some(Ordering::Greater) if stock < LOW_STOCK_THRESHOLD => StockLevel::Low,
            Some(Ordering::Greater) => StockLevel::InStock,
        }
    }
}

impl Entity for Product {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Fields for creating or partially updating a product.
///
/// `None` leaves a field untouched on update and unset on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i64>,
    pub category: Option<EntityId>,
    pub model_code: Option<String>,
    pub campaign_tag: Option<String>,
}

impl ProductDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Columns the product table can be sorted on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    #[default]
    Id,
    Name,
    Brand,
    Category,
    Price,
    Stock,
}
