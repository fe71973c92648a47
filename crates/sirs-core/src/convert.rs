// ── API-to-domain type conversions ──
//
// Bridges raw `sirs_api` response types into canonical `sirs_core::model`
// domain types. Each `From` impl normalizes field names, parses strings into
// strong types, and fills defaults for missing optional data.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use sirs_api::models::{
    CategoryRef, CategoryResponse, DeliveryResponse, NotificationResponse, ProductPayload,
    ProductResponse, ServiceRequestResponse, UserResponse,
};

use crate::model::{
    Category, CategoryLink, Delivery, DeliveryStatus, EntityId, Notification, NotificationKind,
    Product, ProductDraft, ServiceKind, ServiceRequest, ServiceStatus, User, UserRole,
};

// ── Helpers ────────────────────────────────────────────────────────

fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Catalog ────────────────────────────────────────────────────────

impl From<CategoryResponse> for Category {
    fn from(c: CategoryResponse) -> Self {
        Self {
            id: EntityId::new(c.id),
            name: c.name,
            parent: c.parent.map(EntityId::new),
            product_count: c.product_count.unwrap_or(0),
        }
    }
}

impl From<ProductResponse> for Product {
    fn from(p: ProductResponse) -> Self {
        let category = match p.category {
            Some(CategoryRef::Nested(c)) => Some(CategoryLink {
                id: EntityId::new(c.id),
                name: Some(c.name),
            }),
            Some(CategoryRef::Id(id)) => Some(CategoryLink {
                id: EntityId::new(id),
                name: non_empty(p.category_name),
            }),
            None => None,
        };

        Self {
            id: EntityId::new(p.id),
            name: p.name,
            brand: p.brand.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            price: p.price.as_str().to_owned(),
            stock: p.stock.as_str().to_owned(),
            category,
            model_code: non_empty(p.model_code),
            warranty_code: non_empty(p.warranty_code),
            price_list: p.price_list.0,
            price_cash: p.price_cash.0,
            campaign_tag: non_empty(p.campaign_tag),
            image: non_empty(p.image),
        }
    }
}

/// Fill in category names for products that only carried a category id.
pub fn resolve_category_names(products: &mut [Product], categories: &[Category]) {
    let names: HashMap<EntityId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    for link in products.iter_mut().filter_map(|p| p.category.as_mut()) {
        if link.name.is_none() {
            link.name = names.get(&link.id).map(|n| (*n).to_owned());
        }
    }
}

impl From<&ProductDraft> for ProductPayload {
    fn from(d: &ProductDraft) -> Self {
        Self {
            name: d.name.clone(),
            brand: d.brand.clone(),
            description: d.description.clone(),
            price: d.price.clone(),
            stock: d.stock,
            category: d.category.map(EntityId::get),
            model_code: d.model_code.clone(),
            campaign_tag: d.campaign_tag.clone(),
        }
    }
}

// ── Accounts ───────────────────────────────────────────────────────

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: EntityId::new(u.id),
            role: UserRole::from_wire(u.role.as_deref()),
            username: u.username,
            email: non_empty(u.email),
            first_name: u.first_name.unwrap_or_default(),
            last_name: u.last_name.unwrap_or_default(),
            is_active: u.is_active,
            phone: non_empty(u.phone_number),
        }
    }
}

// ── Service & logistics ────────────────────────────────────────────

impl From<ServiceRequestResponse> for ServiceRequest {
    fn from(r: ServiceRequestResponse) -> Self {
        Self {
            id: EntityId::new(r.id),
            customer: r.customer_name.unwrap_or_default(),
            product: r.product_name.unwrap_or_default(),
            kind: r
                .request_type
                .as_deref()
                .and_then(|k| k.parse().ok())
                .unwrap_or(ServiceKind::Other),
            status: r
                .status
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(ServiceStatus::Unknown),
            description: r.description.unwrap_or_default(),
            assignee: non_empty(r.assigned_to_name),
            resolution_notes: non_empty(r.resolution_notes),
            created_at: parse_datetime(r.created_at.as_deref()),
            updated_at: parse_datetime(r.updated_at.as_deref()),
        }
    }
}

impl From<DeliveryResponse> for Delivery {
    fn from(d: DeliveryResponse) -> Self {
        let (customer, phone) = match d.customer {
            Some(c) => (
                non_empty(c.full_name)
                    .or(c.username)
                    .unwrap_or_else(|| format!("#{}", c.id)),
                non_empty(c.phone),
            ),
            None => (String::new(), None),
        };

        Self {
            id: EntityId::new(d.id),
            customer,
            phone,
            product: d.product.unwrap_or_default(),
            scheduled_for: parse_date(d.delivery_date.as_deref()),
            status: d
                .status
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DeliveryStatus::Unknown),
            address: d.address.unwrap_or_default(),
            notes: non_empty(d.notes),
        }
    }
}

impl From<NotificationResponse> for Notification {
    fn from(n: NotificationResponse) -> Self {
        Self {
            id: EntityId::new(n.id),
            kind: n
                .notification_type
                .as_deref()
                .and_then(|k| k.parse().ok())
                .unwrap_or(NotificationKind::General),
            title: n.title,
            message: n.message,
            is_read: n.is_read,
            product: non_empty(n.product_name),
            created_at: parse_datetime(n.created_at.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_with_nested_category() {
        let raw: ProductResponse = serde_json::from_value(json!({
            "id": 5,
            "name": "Fridge",
            "brand": "Beko",
            "price": "1299.90",
            "stock": 4,
            "category": { "id": 2, "name": "Cooling", "parent": null, "product_count": 1 },
            "campaign_tag": ""
        }))
        .expect("decode");

        let product = Product::from(raw);
        assert_eq!(product.id, EntityId::new(5));
        assert_eq!(product.category_name(), "Cooling");
        assert!((product.price_value() - 1299.90).abs() < 1e-9);
        assert!((product.stock_value() - 4.0).abs() < f64::EPSILON);
        assert_eq!(product.campaign_tag, None);
    }

    #[test]
    fn bare_category_ids_resolve_against_category_list() {
        let raw: ProductResponse =
            serde_json::from_value(json!({ "id": 1, "name": "Oven", "category": 7 }))
                .expect("decode");
        let mut products = vec![Product::from(raw)];
        assert_eq!(products[0].category_name(), "");

        let categories = vec![Category {
            id: EntityId::new(7),
            name: "Cooking".into(),
            parent: None,
            product_count: 1,
        }];
        resolve_category_names(&mut products, &categories);
        assert_eq!(products[0].category_name(), "Cooking");
    }

    #[test]
    fn unknown_statuses_do_not_fail() {
        let raw: ServiceRequestResponse = serde_json::from_value(json!({
            "id": 3,
            "request_type": "teleport",
            "status": "escalated",
            "created_at": "2026-02-01T08:30:00.123456+03:00"
        }))
        .expect("decode");

        let req = ServiceRequest::from(raw);
        assert_eq!(req.kind, ServiceKind::Other);
        assert_eq!(req.status, ServiceStatus::Unknown);
        assert!(req.created_at.is_some());
    }

    #[test]
    fn delivery_customer_falls_back_to_username() {
        let raw: DeliveryResponse = serde_json::from_value(json!({
            "id": 9,
            "customer": { "id": 4, "username": "ayse", "full_name": "", "phone": null },
            "delivery_date": "2026-03-02",
            "status": "in_transit"
        }))
        .expect("decode");

        let delivery = Delivery::from(raw);
        assert_eq!(delivery.customer, "ayse");
        assert_eq!(delivery.status, DeliveryStatus::InTransit);
        assert_eq!(
            delivery.scheduled_for,
            NaiveDate::from_ymd_opt(2026, 3, 2)
        );
    }

    #[test]
    fn user_role_parsing() {
        let raw: UserResponse = serde_json::from_value(json!({
            "id": 1, "username": "mehmet", "first_name": "Mehmet", "last_name": "Y", "role": "seller"
        }))
        .expect("decode");
        let user = User::from(raw);
        assert_eq!(user.role, UserRole::Seller);
        assert_eq!(user.display_name(), "Mehmet Y");
        assert!(user.is_active);
    }
}
