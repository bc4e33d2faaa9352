//! Inventory consistency tests
//!
//! Tests for the movement ledger and stock reconciler including:
//! - Stock accounting accuracy (stock = baseline + entries - exits)
//! - Shortfall registry correctness (record exists iff stock < min_stock)
//! - Oversell rejection (a rejected exit leaves no trace)
//! - Movement deletion as exact reversal

use proptest::prelude::*;

use shared::models::{shortfall_needed, MovementKind};
use shared::validation::validate_quantity;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Entries add stock, exits remove it
    #[test]
    fn test_movement_signs() {
        assert_eq!(MovementKind::Entry.sign(), 1);
        assert_eq!(MovementKind::Exit.sign(), -1);
    }

    #[test]
    fn test_movement_kind_labels() {
        assert_eq!(MovementKind::Entry.as_str(), "entry");
        assert_eq!(MovementKind::Exit.as_str(), "exit");
    }

    /// No shortfall when stock meets or exceeds the threshold
    #[test]
    fn test_no_shortfall_at_threshold() {
        assert_eq!(shortfall_needed(5, 5), None);
        assert_eq!(shortfall_needed(10, 5), None);
    }

    /// Shortfall is the exact gap below the threshold
    #[test]
    fn test_shortfall_gap() {
        assert_eq!(shortfall_needed(2, 5), Some(3));
        assert_eq!(shortfall_needed(0, 5), Some(5));
    }

    /// Negative stock still yields a well-formed shortfall
    #[test]
    fn test_shortfall_negative_stock() {
        assert_eq!(shortfall_needed(-3, 5), Some(8));
    }

    /// Zero threshold never produces a shortfall for non-negative stock
    #[test]
    fn test_zero_threshold() {
        assert_eq!(shortfall_needed(0, 0), None);
        assert_eq!(shortfall_needed(100, 0), None);
    }

    /// Movement quantities must be strictly positive
    #[test]
    fn test_quantity_validation() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-4).is_err());
    }

    /// Scenario: an exit drains stock below the threshold
    #[test]
    fn test_exit_opens_shortfall() {
        let mut product = engine::ProductState::new(10, 5);
        engine::record_exit(&mut product, 8).unwrap();

        assert_eq!(product.stock, 2);
        assert_eq!(product.shortfall, Some(3));
    }

    /// Scenario: a subsequent entry clears the shortfall
    #[test]
    fn test_entry_clears_shortfall() {
        let mut product = engine::ProductState::new(10, 5);
        engine::record_exit(&mut product, 8).unwrap();
        engine::record_entry(&mut product, 5).unwrap();

        assert_eq!(product.stock, 7);
        assert_eq!(product.shortfall, None);
    }

    /// Scenario: an oversized exit is rejected without side effects
    #[test]
    fn test_oversell_rejected() {
        let mut product = engine::ProductState::new(10, 5);
        let before = product.clone();

        let err = engine::record_exit(&mut product, 15).unwrap_err();
        assert_eq!(err, engine::EngineError::InsufficientStock);
        assert_eq!(product, before);
        assert!(product.ledger.is_empty());
    }

    /// Scenario: deleting an exit restores stock and clears the shortfall
    #[test]
    fn test_delete_exit_reverses() {
        let mut product = engine::ProductState::new(10, 5);
        let exit_id = engine::record_exit(&mut product, 8).unwrap();
        assert_eq!(product.shortfall, Some(3));

        engine::delete_movement(&mut product, exit_id).unwrap();

        assert_eq!(product.stock, 10);
        assert_eq!(product.shortfall, None);
        assert!(product.ledger.is_empty());
    }

    /// Deleting an entry may drive stock negative; the registry still tracks it
    #[test]
    fn test_delete_entry_can_go_negative() {
        let mut product = engine::ProductState::new(0, 5);
        let entry_id = engine::record_entry(&mut product, 3).unwrap();
        engine::record_exit(&mut product, 2).unwrap();
        assert_eq!(product.stock, 1);

        engine::delete_movement(&mut product, entry_id).unwrap();

        assert_eq!(product.stock, -2);
        assert_eq!(product.shortfall, Some(7));
    }

    /// Deleting an unknown movement is an error and changes nothing
    #[test]
    fn test_delete_unknown_movement() {
        let mut product = engine::ProductState::new(10, 5);
        let before = product.clone();

        let err = engine::delete_movement(&mut product, 999).unwrap_err();
        assert_eq!(err, engine::EngineError::NotFound);
        assert_eq!(product, before);
    }

    /// A stock adjustment is expressed as a synthetic movement
    #[test]
    fn test_adjustment_emits_movement() {
        let mut product = engine::ProductState::new(10, 5);
        engine::adjust_stock(&mut product, 4).unwrap();

        assert_eq!(product.stock, 4);
        assert_eq!(product.shortfall, Some(1));
        assert_eq!(product.ledger.len(), 1);
        assert_eq!(product.ledger[0].kind, MovementKind::Exit);
        assert_eq!(product.ledger[0].quantity, 6);
    }

    /// Adjusting to the current stock is a no-op
    #[test]
    fn test_adjustment_noop() {
        let mut product = engine::ProductState::new(10, 5);
        engine::adjust_stock(&mut product, 10).unwrap();

        assert_eq!(product.stock, 10);
        assert!(product.ledger.is_empty());
    }

    /// Adjusting below zero is rejected
    #[test]
    fn test_adjustment_negative_target() {
        let mut product = engine::ProductState::new(10, 5);
        let err = engine::adjust_stock(&mut product, -1).unwrap_err();
        assert_eq!(err, engine::EngineError::InvalidQuantity);
        assert_eq!(product.stock, 10);
    }

    /// Reading the registry twice with no intervening movement returns
    /// identical results, and a rejected operation between the reads
    /// changes nothing
    #[test]
    fn test_shortfall_reads_are_idempotent() {
        let mut product = engine::ProductState::new(10, 5);
        engine::record_exit(&mut product, 8).unwrap();

        let first = engine::list_shortfalls(&product);
        let second = engine::list_shortfalls(&product);
        assert_eq!(first, vec![3]);
        assert_eq!(first, second);

        // A failed oversell must not disturb the registry either
        assert!(engine::record_exit(&mut product, 100).is_err());
        assert_eq!(engine::list_shortfalls(&product), first);
    }

    /// An entry that would overflow stock is rejected without side effects
    #[test]
    fn test_entry_overflow_rejected() {
        let mut product = engine::ProductState::new(i32::MAX - 1, 0);
        let before = product.clone();

        let err = engine::record_entry(&mut product, 5).unwrap_err();
        assert_eq!(err, engine::EngineError::Overflow);
        assert_eq!(product, before);
        assert!(product.ledger.is_empty());
    }

    /// Raising min_stock on an otherwise untouched product opens a shortfall
    #[test]
    fn test_threshold_change_refreshes_registry() {
        let mut product = engine::ProductState::new(10, 5);
        assert_eq!(product.shortfall, None);

        engine::set_min_stock(&mut product, 15);
        assert_eq!(product.shortfall, Some(5));

        engine::set_min_stock(&mut product, 8);
        assert_eq!(product.shortfall, None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for valid movement quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=1000
    }

    /// Strategy for stock thresholds
    fn min_stock_strategy() -> impl Strategy<Value = i32> {
        0i32..=500
    }

    /// Strategy for a batch of mixed operations
    fn ops_strategy() -> impl Strategy<Value = Vec<engine::Op>> {
        prop::collection::vec(
            prop_oneof![
                quantity_strategy().prop_map(engine::Op::Entry),
                quantity_strategy().prop_map(engine::Op::Exit),
                (0usize..20).prop_map(engine::Op::DeleteNth),
                (0i32..=1000).prop_map(engine::Op::Adjust),
            ],
            1..40,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// A shortfall record exists exactly when stock < min_stock
        #[test]
        fn prop_shortfall_iff_below_threshold(
            stock in -1000i32..=1000,
            min_stock in min_stock_strategy()
        ) {
            match shortfall_needed(stock, min_stock) {
                Some(needed) => {
                    prop_assert!(stock < min_stock);
                    prop_assert_eq!(needed, min_stock - stock);
                    prop_assert!(needed > 0);
                }
                None => prop_assert!(stock >= min_stock),
            }
        }

        /// Receiving the reported shortfall clears it
        #[test]
        fn prop_receiving_shortfall_clears_it(
            stock in -1000i32..=1000,
            min_stock in min_stock_strategy()
        ) {
            if let Some(needed) = shortfall_needed(stock, min_stock) {
                prop_assert_eq!(shortfall_needed(stock + needed, min_stock), None);
            }
        }

        /// Stock always equals baseline plus the signed sum of surviving movements
        #[test]
        fn prop_stock_accounting(
            baseline in 0i32..=1000,
            min_stock in min_stock_strategy(),
            ops in ops_strategy()
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            for op in ops {
                let _ = engine::apply(&mut product, op);
            }

            let ledger_sum: i32 = product
                .ledger
                .iter()
                .map(|m| m.kind.sign() * m.quantity)
                .sum();

            prop_assert_eq!(product.stock, baseline + ledger_sum);
        }

        /// The registry is correct after any sequence of operations
        #[test]
        fn prop_registry_always_consistent(
            baseline in 0i32..=1000,
            min_stock in min_stock_strategy(),
            ops in ops_strategy()
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            for op in ops {
                let _ = engine::apply(&mut product, op);
                prop_assert_eq!(
                    product.shortfall,
                    shortfall_needed(product.stock, product.min_stock)
                );
            }
        }

        /// A rejected exit leaves state untouched
        #[test]
        fn prop_rejected_exit_is_traceless(
            baseline in 0i32..=100,
            min_stock in min_stock_strategy(),
            excess in 1i32..=1000
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            let before = product.clone();

            let result = engine::record_exit(&mut product, baseline + excess);

            prop_assert_eq!(result, Err(engine::EngineError::InsufficientStock));
            prop_assert_eq!(product, before);
        }

        /// An exit never succeeds for more than the available stock
        #[test]
        fn prop_no_oversell(
            baseline in 0i32..=1000,
            min_stock in min_stock_strategy(),
            quantity in quantity_strategy()
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            let result = engine::record_exit(&mut product, quantity);

            if quantity <= baseline {
                prop_assert!(result.is_ok());
                prop_assert_eq!(product.stock, baseline - quantity);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(product.stock, baseline);
            }
        }

        /// Recording then deleting a movement is an exact round trip
        #[test]
        fn prop_delete_reverses_record(
            baseline in 0i32..=1000,
            min_stock in min_stock_strategy(),
            quantity in quantity_strategy(),
            as_exit in any::<bool>()
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            let before = product.clone();

            let recorded = if as_exit {
                engine::record_exit(&mut product, quantity)
            } else {
                engine::record_entry(&mut product, quantity)
            };

            if let Ok(id) = recorded {
                engine::delete_movement(&mut product, id).unwrap();
                prop_assert_eq!(product, before);
            }
        }

        /// Consecutive registry reads agree, before and after a failed write
        #[test]
        fn prop_shortfall_reads_idempotent(
            baseline in 0i32..=1000,
            min_stock in min_stock_strategy(),
            ops in ops_strategy()
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            for op in ops {
                let _ = engine::apply(&mut product, op);
            }

            let first = engine::list_shortfalls(&product);
            prop_assert_eq!(&first, &engine::list_shortfalls(&product));

            // An invalid quantity is always rejected and leaves no trace
            prop_assert!(engine::record_exit(&mut product, 0).is_err());
            prop_assert_eq!(&first, &engine::list_shortfalls(&product));
        }

        /// An adjustment lands stock exactly on the requested value
        #[test]
        fn prop_adjustment_is_exact(
            baseline in 0i32..=1000,
            min_stock in min_stock_strategy(),
            target in 0i32..=1000
        ) {
            let mut product = engine::ProductState::new(baseline, min_stock);
            engine::adjust_stock(&mut product, target).unwrap();

            prop_assert_eq!(product.stock, target);
            prop_assert_eq!(
                product.shortfall,
                shortfall_needed(target, min_stock)
            );
        }
    }
}

// ============================================================================
// Concurrent Writer Tests
// ============================================================================

// The mutex stands in for the per-product row lock: every writer performs
// its read-modify-write while holding it, which is the serialization the
// database lock provides.
#[cfg(test)]
mod concurrency_tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// Interleaved entries and exits from many writers lose no updates
    #[test]
    fn test_parallel_writers_lose_no_updates() {
        let product = Arc::new(Mutex::new(engine::ProductState::new(1_000, 50)));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let product = Arc::clone(&product);
                thread::spawn(move || {
                    for i in 0..100 {
                        let mut locked = product.lock().unwrap();
                        if (worker + i) % 3 == 0 {
                            let _ = engine::record_exit(&mut locked, 2);
                        } else {
                            let _ = engine::record_entry(&mut locked, 1);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let final_state = product.lock().unwrap();
        let ledger_sum: i32 = final_state
            .ledger
            .iter()
            .map(|m| m.kind.sign() * m.quantity)
            .sum();

        assert_eq!(final_state.stock, 1_000 + ledger_sum);
        assert_eq!(
            final_state.shortfall,
            shortfall_needed(final_state.stock, final_state.min_stock)
        );
    }

    /// Racing exits can never drain more than the available stock
    #[test]
    fn test_parallel_exits_never_oversell() {
        let product = Arc::new(Mutex::new(engine::ProductState::new(100, 10)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let product = Arc::clone(&product);
                thread::spawn(move || {
                    let mut locked = product.lock().unwrap();
                    engine::record_exit(&mut locked, 30).is_ok()
                })
            })
            .collect();

        let succeeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        let final_state = product.lock().unwrap();

        // Only three exits of 30 fit into 100 units
        assert_eq!(succeeded, 3);
        assert_eq!(final_state.ledger.len(), 3);
        assert_eq!(final_state.stock, 10);
        assert!(final_state.stock >= 0);
        assert_eq!(
            final_state.shortfall,
            shortfall_needed(final_state.stock, final_state.min_stock)
        );
    }

    /// Deletes racing against new movements keep the accounting exact
    #[test]
    fn test_parallel_deletes_stay_consistent() {
        let product = Arc::new(Mutex::new(engine::ProductState::new(0, 5)));

        let seeded: Vec<u64> = {
            let mut locked = product.lock().unwrap();
            (0..20)
                .map(|_| engine::record_entry(&mut locked, 3).unwrap())
                .collect()
        };

        let mut handles = Vec::new();
        for id in seeded {
            let product = Arc::clone(&product);
            handles.push(thread::spawn(move || {
                let mut locked = product.lock().unwrap();
                engine::delete_movement(&mut locked, id).unwrap();
            }));
        }
        for _ in 0..4 {
            let product = Arc::clone(&product);
            handles.push(thread::spawn(move || {
                let mut locked = product.lock().unwrap();
                let _ = engine::record_entry(&mut locked, 2);
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let final_state = product.lock().unwrap();
        let ledger_sum: i32 = final_state
            .ledger
            .iter()
            .map(|m| m.kind.sign() * m.quantity)
            .sum();

        // All 20 seeded entries were deleted; only the 4 late entries remain
        assert_eq!(final_state.ledger.len(), 4);
        assert_eq!(final_state.stock, ledger_sum);
        assert_eq!(
            final_state.shortfall,
            shortfall_needed(final_state.stock, final_state.min_stock)
        );
    }
}

// ============================================================================
// Reconciler Simulation (mirrors the transactional engine in-memory)
// ============================================================================

#[cfg(test)]
mod engine {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Movement {
        pub id: u64,
        pub kind: MovementKind,
        pub quantity: i32,
    }

    #[derive(Debug, Clone)]
    pub struct ProductState {
        pub stock: i32,
        pub min_stock: i32,
        pub shortfall: Option<i32>,
        pub ledger: Vec<Movement>,
        next_id: u64,
    }

    // Equality over observable state only, ignoring the id counter
    impl PartialEq for ProductState {
        fn eq(&self, other: &Self) -> bool {
            self.stock == other.stock
                && self.min_stock == other.min_stock
                && self.shortfall == other.shortfall
                && self.ledger == other.ledger
        }
    }

    impl Eq for ProductState {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum EngineError {
        InvalidQuantity,
        InsufficientStock,
        NotFound,
        Overflow,
    }

    #[derive(Debug, Clone, Copy)]
    pub enum Op {
        Entry(i32),
        Exit(i32),
        DeleteNth(usize),
        Adjust(i32),
    }

    impl ProductState {
        pub fn new(stock: i32, min_stock: i32) -> Self {
            let mut state = Self {
                stock,
                min_stock,
                shortfall: None,
                ledger: Vec::new(),
                next_id: 1,
            };
            state.refresh_shortfall();
            state
        }

        fn refresh_shortfall(&mut self) {
            self.shortfall = shortfall_needed(self.stock, self.min_stock);
        }

        fn push(&mut self, kind: MovementKind, quantity: i32) -> u64 {
            let id = self.next_id;
            self.next_id += 1;
            self.ledger.push(Movement { id, kind, quantity });
            id
        }
    }

    pub fn record_entry(product: &mut ProductState, quantity: i32) -> Result<u64, EngineError> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity);
        }
        let new_stock = product
            .stock
            .checked_add(quantity)
            .ok_or(EngineError::Overflow)?;
        let id = product.push(MovementKind::Entry, quantity);
        product.stock = new_stock;
        product.refresh_shortfall();
        Ok(id)
    }

    pub fn record_exit(product: &mut ProductState, quantity: i32) -> Result<u64, EngineError> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity);
        }
        if quantity > product.stock {
            return Err(EngineError::InsufficientStock);
        }
        let id = product.push(MovementKind::Exit, quantity);
        product.stock -= quantity;
        product.refresh_shortfall();
        Ok(id)
    }

    /// Deletion is an unconditional reversal, even below zero
    pub fn delete_movement(product: &mut ProductState, id: u64) -> Result<(), EngineError> {
        let idx = product
            .ledger
            .iter()
            .position(|m| m.id == id)
            .ok_or(EngineError::NotFound)?;
        let movement = &product.ledger[idx];
        let new_stock = product
            .stock
            .checked_sub(movement.kind.sign() * movement.quantity)
            .ok_or(EngineError::Overflow)?;
        product.ledger.remove(idx);
        product.stock = new_stock;
        product.refresh_shortfall();
        Ok(())
    }

    pub fn adjust_stock(product: &mut ProductState, new_stock: i32) -> Result<(), EngineError> {
        if new_stock < 0 {
            return Err(EngineError::InvalidQuantity);
        }
        let delta = new_stock - product.stock;
        if delta > 0 {
            record_entry(product, delta)?;
        } else if delta < 0 {
            // A non-negative target keeps the synthetic exit within stock
            record_exit(product, -delta)?;
        }
        Ok(())
    }

    pub fn set_min_stock(product: &mut ProductState, min_stock: i32) {
        product.min_stock = min_stock;
        product.refresh_shortfall();
    }

    /// Read side of the registry, as a listing endpoint would render it.
    /// Pure read: never recomputes or mutates anything.
    pub fn list_shortfalls(product: &ProductState) -> Vec<i32> {
        product.shortfall.into_iter().collect()
    }

    pub fn apply(product: &mut ProductState, op: Op) -> Result<(), EngineError> {
        match op {
            Op::Entry(q) => record_entry(product, q).map(|_| ()),
            Op::Exit(q) => record_exit(product, q).map(|_| ()),
            Op::DeleteNth(n) => {
                let id = product
                    .ledger
                    .get(n % product.ledger.len().max(1))
                    .map(|m| m.id)
                    .ok_or(EngineError::NotFound)?;
                delete_movement(product, id)
            }
            Op::Adjust(target) => adjust_stock(product, target),
        }
    }
}
