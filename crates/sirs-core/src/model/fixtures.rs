// Test builders shared by the engine and store tests.

use std::sync::Arc;

use super::{CategoryLink, EntityId, Product};

pub(crate) fn product(id: u64, price: &str, stock: &str) -> Product {
    Product {
        id: EntityId::new(id),
        name: format!("Product {id}"),
        brand: "Beko".into(),
        description: String::new(),
        price: price.into(),
        stock: stock.into(),
        category: None,
        model_code: None,
        warranty_code: None,
        price_list: None,
        price_cash: None,
        campaign_tag: None,
        image: None,
    }
}

pub(crate) fn named(id: u64, name: &str, brand: &str, category: Option<(u64, &str)>) -> Product {
    Product {
        name: name.into(),
        brand: brand.into(),
        category: category.map(|(cid, cname)| CategoryLink {
            id: EntityId::new(cid),
            name: Some(cname.into()),
        }),
        ..product(id, "0", "0")
    }
}

pub(crate) fn shared(items: Vec<Product>) -> Vec<Arc<Product>> {
    items.into_iter().map(Arc::new).collect()
}

pub(crate) fn ids(items: &[Arc<Product>]) -> Vec<u64> {
    items.iter().map(|p| p.id.get()).collect()
}
