// ── Domain model ──

pub mod account;
pub mod entity_id;
pub mod product;
pub mod service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use account::{User, UserRole};
pub use entity_id::{Entity, EntityId};
pub use product::{
    Category, CategoryLink, LOW_STOCK_THRESHOLD, Product, ProductDraft, ProductField, StockLevel,
    parse_number,
};
pub use service::{
    Delivery, DeliveryStatus, Notification, NotificationKind, ServiceKind, ServiceRequest,
    ServiceStatus,
};
