// ── Free-text search ──
//
// Case-insensitive substring matching shared by the product filter and
// the plain list views.

use std::sync::Arc;

use crate::model::{Category, Delivery, Notification, Product, ServiceRequest, User};

/// Entities that expose text fields to free-text search.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// `true` when `needle` is empty or occurs (case-insensitively) in any
/// field. Whitespace in the needle is matched literally.
pub fn matches_search<S: Searchable + ?Sized>(item: &S, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

impl<T: Searchable + ?Sized> Searchable for Arc<T> {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.brand.as_str(), self.category_name()]
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.username.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ];
        fields.extend(self.email.as_deref());
        fields
    }
}

impl Searchable for ServiceRequest {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer.as_str(),
            self.product.as_str(),
            self.description.as_str(),
        ]
    }
}

impl Searchable for Delivery {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer.as_str(),
            self.product.as_str(),
            self.address.as_str(),
        ]
    }
}

impl Searchable for Notification {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str()]
    }
}
