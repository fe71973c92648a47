// ── Saved views ──
//
// Named presets. Applying one starts from default criteria and sort, so it
// always replaces whatever ad hoc filters were active.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::filter::{FilterCriteria, StockFilter};
use super::sort::{SortDirection, SortSpec};
use crate::model::ProductField;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SavedView {
    LowStock,
    OutOfStock,
    Recent,
}

impl SavedView {
    /// Criteria and sort this view produces.
    pub fn preset(self) -> (FilterCriteria, SortSpec) {
        let mut criteria = FilterCriteria::default();
        let mut sort = SortSpec::default();
        match self {
            Self::LowStock => criteria.stock = StockFilter::LowStock,
            Self::OutOfStock => criteria.stock = StockFilter::OutOfStock,
            Self::Recent => sort = SortSpec::new(ProductField::Id, SortDirection::Desc),
        }
        (criteria, sort)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LowStock => "Low stock",
            Self::OutOfStock => "Out of stock",
            Self::Recent => "Recently added",
        }
    }
}
