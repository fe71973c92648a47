// ── Filter evaluator ──
//
// Pure predicates over products. Every constraint is optional; malformed
// numeric bounds impose no constraint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::search::matches_search;
use crate::model::{EntityId, Product, StockLevel};

/// Stock-state selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    OutOfStock,
    LowStock,
}

impl StockFilter {
    /// Classification follows [`Product::stock_level`]; negative stock
    /// matches none of the specific states.
    pub fn matches(self, product: &Product) -> bool {
        let level = product.stock_level();
        match self {
            Self::All => true,
            Self::InStock => matches!(level, StockLevel::Low | StockLevel::InStock),
            Self::OutOfStock => level == StockLevel::OutOfStock,
            Self::LowStock => level == StockLevel::Low,
        }
    }
}

/// Category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EntityId),
}

impl CategoryFilter {
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => product.category_id() == Some(id),
        }
    }
}

/// The full set of filter constraints.
///
/// Price bounds hold the text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub category: CategoryFilter,
    pub min_price: String,
    pub max_price: String,
    pub stock: StockFilter,
}

/// A partial update to `FilterCriteria`; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub category: Option<CategoryFilter>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub stock: Option<StockFilter>,
}

impl FilterPatch {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn stock(stock: StockFilter) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }
}

/// Parse a user-typed bound. Blank or non-numeric text is no bound.
fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FilterCriteria {
    pub fn min_bound(&self) -> Option<f64> {
        parse_bound(&self.min_price)
    }

    pub fn max_bound(&self) -> Option<f64> {
        parse_bound(&self.max_price)
    }

    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(min) = patch.min_price {
            self.min_price = min;
        }
        if let Some(max) = patch.max_price {
            self.max_price = max;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
    }

    /// `true` when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.category == CategoryFilter::All
            && self.min_bound().is_none()
            && self.max_bound().is_none()
            && self.stock == StockFilter::All
    }

    /// All constraints combined with AND.
    pub fn matches(&self, product: &Product) -> bool {
        if !matches_search(product, &self.search) || !self.category.matches(product) {
            return false;
        }

        let price = product.price_value();
        if self.min_bound().is_some_and(|min| price < min) {
            return false;
        }
        if self.max_bound().is_some_and(|max| price > max) {
            return false;
        }

        self.stock.matches(product)
    }
}

/// Products satisfying `criteria`, in source order. The source is untouched.
pub fn filter_products(items: &[Arc<Product>], criteria: &FilterCriteria) -> Vec<Arc<Product>> {
    items
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}
