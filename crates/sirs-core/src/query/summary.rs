// ── Inventory summary statistics ──

use std::sync::Arc;

use serde::Serialize;

use crate::model::{Product, StockLevel};

/// Counts over the full product list, plus the filtered count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub filtered: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    /// Σ price × stock over products with positive stock.
    pub inventory_value: f64,
}

impl Summary {
    pub fn compute(all: &[Arc<Product>], filtered: usize) -> Self {
        let mut summary = Self {
            total: all.len(),
            filtered,
            ..Self::default()
        };
        for product in all {
            match product.stock_level() {
                StockLevel::OutOfStock => summary.out_of_stock += 1,
                StockLevel::Low => {
                    summary.in_stock += 1;
                    summary.low_stock += 1;
                }
                StockLevel::InStock => summary.in_stock += 1,
                StockLevel::Negative => {}
            }
            let stock = product.stock_value();
            if stock > 0.0 {
                summary.inventory_value += product.price_value() * stock;
            }
        }
        summary
    }
}
