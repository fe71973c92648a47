// Wire types for the REST API.
//
// These mirror the backend serializers field-for-field. Fields the backend
// may omit or null are `Option`/`#[serde(default)]` so a partially populated
// record never fails the whole list. `sirs-core` converts them into domain
// types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Numeric text ────────────────────────────────────────────────────

/// A decimal the backend transmits as text (`"1299.90"`), a JSON number,
/// or `null`. The raw text is preserved; interpretation happens in core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NumericText(pub Option<String>);

impl NumericText {
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl<'de> Deserialize<'de> for NumericText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self(match raw {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }))
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

/// Category as returned by `/categories/` or nested inside a product.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub product_count: Option<u64>,
}

/// A product's category reference: nested object or bare id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(u64),
    Nested(CategoryResponse),
}

/// Product record from `/products/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: NumericText,
    #[serde(default)]
    pub stock: NumericText,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub model_code: Option<String>,
    #[serde(default)]
    pub warranty_code: Option<String>,
    #[serde(default)]
    pub price_list: NumericText,
    #[serde(default)]
    pub price_cash: NumericText,
    #[serde(default)]
    pub campaign_tag: Option<String>,
}

/// Body for `POST /products/` and `PATCH /products/{id}/`.
///
/// Every field is optional so the same type serves partial updates;
/// unset fields are left out of the JSON body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_tag: Option<String>,
}

// ── Accounts ────────────────────────────────────────────────────────

/// User record from `/users/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn default_true() -> bool {
    true
}

// ── Service & logistics ─────────────────────────────────────────────

/// Service request from `/service-requests/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceRequestResponse {
    pub id: u64,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Customer summary nested in a delivery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryCustomer {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Delivery from `/deliveries/` (served as a bare array).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryResponse {
    pub id: u64,
    #[serde(default)]
    pub customer: Option<DeliveryCustomer>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Notification from `/notifications/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationResponse {
    pub id: u64,
    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
}

// ── Auth ────────────────────────────────────────────────────────────

/// `POST /token/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// `POST /token/refresh/` response. `refresh` is present when the backend
/// rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_text_accepts_string_number_and_null() {
        let p: ProductResponse = serde_json::from_value(json!({
            "id": 1, "name": "A", "price": "10.50", "stock": 4, "price_list": null
        }))
        .expect("decode");
        assert_eq!(p.price.as_str(), "10.50");
        assert_eq!(p.stock.as_str(), "4");
        assert_eq!(p.price_list, NumericText(None));
        assert_eq!(p.price_cash.as_str(), "");
    }

    #[test]
    fn category_ref_accepts_id_or_object() {
        let nested: ProductResponse = serde_json::from_value(json!({
            "id": 1, "name": "A",
            "category": { "id": 3, "name": "Fridges", "parent": null, "product_count": 12 }
        }))
        .expect("decode");
        assert!(matches!(nested.category, Some(CategoryRef::Nested(ref c)) if c.id == 3));

        let bare: ProductResponse =
            serde_json::from_value(json!({ "id": 2, "name": "B", "category": 3 }))
                .expect("decode");
        assert!(matches!(bare.category, Some(CategoryRef::Id(3))));
    }

    #[test]
    fn payload_skips_unset_fields() {
        let body = ProductPayload {
            price: Some("99.00".into()),
            ..ProductPayload::default()
        };
        assert_eq!(
            serde_json::to_value(&body).expect("encode"),
            json!({ "price": "99.00" })
        );
    }
}
