//! Insufficient-stock registry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product currently below its minimum stock threshold
///
/// Derived state: at most one record exists per product, and a record
/// exists exactly while `stock < min_stock`. Absence means the product
/// is adequately stocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsufficientStockRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Units needed to bring stock back up to the threshold
    pub quantity_needed: i32,
    pub updated_at: DateTime<Utc>,
}

/// Units needed to reach `min_stock` from `stock`, when any are needed
///
/// Returns `None` when stock meets or exceeds the threshold; the registry
/// keeps no record in that case.
pub fn shortfall_needed(stock: i32, min_stock: i32) -> Option<i32> {
    if stock < min_stock {
        Some(min_stock - stock)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_below_threshold() {
        assert_eq!(shortfall_needed(2, 5), Some(3));
    }

    #[test]
    fn test_no_shortfall_at_threshold() {
        assert_eq!(shortfall_needed(5, 5), None);
    }

    #[test]
    fn test_no_shortfall_above_threshold() {
        assert_eq!(shortfall_needed(7, 5), None);
    }

    #[test]
    fn test_shortfall_with_negative_stock() {
        assert_eq!(shortfall_needed(-3, 5), Some(8));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A record is warranted exactly when stock < min_stock
            #[test]
            fn prop_shortfall_iff_below_threshold(
                stock in -1000i32..1000,
                min_stock in 0i32..1000
            ) {
                let needed = shortfall_needed(stock, min_stock);
                prop_assert_eq!(needed.is_some(), stock < min_stock);
            }

            /// When a shortfall exists, adding that many units clears it
            #[test]
            fn prop_shortfall_quantity_restores_threshold(
                stock in -1000i32..1000,
                min_stock in 0i32..1000
            ) {
                if let Some(needed) = shortfall_needed(stock, min_stock) {
                    prop_assert!(needed > 0);
                    prop_assert_eq!(shortfall_needed(stock + needed, min_stock), None);
                }
            }
        }
    }
}
