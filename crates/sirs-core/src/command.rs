// ── Command API ──
//
// All write operations flow through the `Command` enum. The controller
// routes each variant to the API and refetches the product list
// afterwards.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{EntityId, Product, ProductDraft};

#[derive(Debug, Clone)]
pub enum Command {
    CreateProduct(ProductDraft),
    UpdateProduct { id: EntityId, draft: ProductDraft },
    DeleteProduct { id: EntityId },
    /// Delete several products; each id succeeds or fails on its own.
    DeleteProducts { ids: Vec<EntityId> },
}

#[derive(Debug, Clone)]
pub enum CommandResult {
    Product(Arc<Product>),
    Deleted(EntityId),
    Bulk(BulkOutcome),
}

/// Per-item result of a bulk action. There is no rollback: items that
/// succeeded stay applied even when others failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub succeeded: Vec<EntityId>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: EntityId,
    pub reason: String,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Check a draft before sending it. Creation needs a name and price;
/// any supplied price must be numeric and stock non-negative.
pub(crate) fn validate_draft(draft: &ProductDraft, creating: bool) -> Result<(), String> {
    if creating {
        if draft.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err("product name is required".into());
        }
        if draft.price.is_none() {
            return Err("product price is required".into());
        }
    } else if draft.is_empty() {
        return Err("nothing to update".into());
    }

    if let Some(price) = draft.price.as_deref() {
        match price.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => {}
            _ => return Err(format!("invalid price: {price:?}")),
        }
    }
    if draft.stock.is_some_and(|s| s < 0) {
        return Err("stock cannot be negative".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_and_price() {
        let draft = ProductDraft {
            name: Some("Oven".into()),
            ..ProductDraft::default()
        };
        assert!(validate_draft(&draft, true).is_err());

        let draft = ProductDraft {
            price: Some("999.90".into()),
            ..draft
        };
        assert!(validate_draft(&draft, true).is_ok());
    }

    #[test]
    fn update_rejects_empty_and_bad_numbers() {
        assert!(validate_draft(&ProductDraft::default(), false).is_err());

        let draft = ProductDraft {
            price: Some("ten".into()),
            ..ProductDraft::default()
        };
        assert!(validate_draft(&draft, false).is_err());

        let draft = ProductDraft {
            stock: Some(-1),
            ..ProductDraft::default()
        };
        assert!(validate_draft(&draft, false).is_err());
    }
}
