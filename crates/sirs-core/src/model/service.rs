// ── After-sales domain types ──
//
// Service requests, deliveries and notifications. Status strings the
// backend may grow are folded into an `Unknown`/`Other` variant rather
// than failing the whole list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::{Entity, EntityId};

// ── Service requests ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Repair,
    Maintenance,
    Warranty,
    Complaint,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Pending,
    InQueue,
    InProgress,
    Completed,
    Cancelled,
    Unknown,
}

impl ServiceStatus {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InQueue | Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: EntityId,
    pub customer: String,
    pub product: String,
    pub kind: ServiceKind,
    pub status: ServiceStatus,
    pub description: String,
    pub assignee: Option<String>,
    pub resolution_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ServiceRequest {
    fn id(&self) -> EntityId {
        self.id
    }
}

// ── Deliveries ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: EntityId,
    pub customer: String,
    pub phone: Option<String>,
    pub product: String,
    pub scheduled_for: Option<NaiveDate>,
    pub status: DeliveryStatus,
    pub address: String,
    pub notes: Option<String>,
}

impl Entity for Delivery {
    fn id(&self) -> EntityId {
        self.id
    }
}

// ── Notifications ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PriceDrop,
    Restock,
    ServiceUpdate,
    Recommendation,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub product: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Notification {
    fn id(&self) -> EntityId {
        self.id
    }
}
