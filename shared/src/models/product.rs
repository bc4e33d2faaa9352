//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product tracked by the inventory system
///
/// `stock` is a materialized aggregate: it is mutated only by the stock
/// reconciler as inventory movements are recorded or deleted, never set
/// directly outside of product creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Current stock level. May go negative transiently when movements
    /// are deleted out of order.
    pub stock: i32,
    /// Threshold below which the product is flagged as under-stocked
    pub min_stock: i32,
    /// Unit price, fixed-scale decimal
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is currently below its minimum stock threshold
    pub fn is_under_stocked(&self) -> bool {
        self.stock < self.min_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i32, min_stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            description: String::new(),
            stock,
            min_stock,
            price: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_under_stocked_below_threshold() {
        assert!(product(2, 5).is_under_stocked());
    }

    #[test]
    fn test_not_under_stocked_at_threshold() {
        assert!(!product(5, 5).is_under_stocked());
    }
}
