// ── User account types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::{Entity, EntityId};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Seller,
    Customer,
    Unknown,
}

impl UserRole {
    pub fn from_wire(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.parse().ok()).unwrap_or(Self::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub phone: Option<String>,
}

impl User {
    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_owned()
        }
    }
}

impl Entity for User {
    fn id(&self) -> EntityId {
        self.id
    }
}
