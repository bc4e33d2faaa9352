//! Inventory movement models
//!
//! Movements are append-only: an entry or exit is never edited after
//! creation, only deleted (which reverses its stock effect).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock received into the warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_received: i32,
    pub date_received: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Stock sold out of the warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryExit {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_sold: i32,
    pub date_sold: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// The two kinds of inventory movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Entry,
    Exit,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
        }
    }

    /// Signed effect of one unit of this movement on product stock
    pub fn sign(&self) -> i32 {
        match self {
            MovementKind::Entry => 1,
            MovementKind::Exit => -1,
        }
    }
}
