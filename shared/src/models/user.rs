//! User account and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Roles defining what a user may do
///
/// Consultants are read-only: they may view products and inventory but
/// never register movements or edit the catalog. User administration is
/// reserved for admins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Consultant,
    Sales,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Consultant => "consultant",
            UserRole::Sales => "sales",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "consultant" => Some(UserRole::Consultant),
            "sales" => Some(UserRole::Sales),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Whether this role may register movements and edit products
    pub fn can_manage_inventory(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Sales)
    }
}

/// Role assigned to accounts created through self-registration
impl Default for UserRole {
    fn default() -> Self {
        UserRole::Consultant
    }
}
