//! In-memory session store for the loaded datasets.
//!
//! The store owns the current order and price snapshots and hands out cached
//! derived values through [`Memo`]. Every mutation bumps a revision counter;
//! a memo recomputes only when its cached revision is stale. Single-threaded
//! by design, so plain `RefCell` interior mutability is enough.

use std::cell::RefCell;

use crate::domain::{MaterialPriceRecord, OrderRecord};

/// Holds the datasets for one analysis session.
#[derive(Debug, Default)]
pub struct SessionStore {
    orders: Vec<OrderRecord>,
    material_prices: Vec<MaterialPriceRecord>,
    revision: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the order snapshot, invalidating every memo.
    pub fn set_orders(&mut self, orders: Vec<OrderRecord>) {
        self.orders = orders;
        self.revision += 1;
    }

    /// Replace the price snapshot, invalidating every memo.
    pub fn set_material_prices(&mut self, prices: Vec<MaterialPriceRecord>) {
        self.material_prices = prices;
        self.revision += 1;
    }

    /// Drop both snapshots, invalidating every memo.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.material_prices.clear();
        self.revision += 1;
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn material_prices(&self) -> &[MaterialPriceRecord] {
        &self.material_prices
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// A derived value cached against a store revision.
#[derive(Debug, Default)]
pub struct Memo<T> {
    cached: RefCell<Option<(u64, T)>>,
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self {
            cached: RefCell::new(None),
        }
    }

    /// Return the cached value for `revision`, computing it with `f` when the
    /// cache is empty or stale.
    pub fn get_or_compute(&self, revision: u64, f: impl FnOnce() -> T) -> T {
        let mut slot = self.cached.borrow_mut();
        match slot.as_ref() {
            Some((rev, value)) if *rev == revision => value.clone(),
            _ => {
                let value = f();
                *slot = Some((revision, value.clone()));
                value
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> OrderRecord {
        OrderRecord {
            order_id: "O1".to_string(),
            customer_id: "C1".to_string(),
            customer_name: "Acme".to_string(),
            product: "Blocks".to_string(),
            category: "Concrete".to_string(),
            region: "North".to_string(),
            total_sale: 1000.0,
            quantity: 1,
            shipping_cost: 0.0,
            tax: 0.0,
            delivery_days: 2.0,
            review_score: 4.0,
            material_cost: 0.0,
            materials_used: String::new(),
            return_requested: false,
            customer_type: "New".to_string(),
            date: "2023-01-15".to_string(),
            status: "Delivered".to_string(),
        }
    }

    #[test]
    fn mutations_bump_the_revision() {
        let mut store = SessionStore::new();
        let r0 = store.revision();
        store.set_orders(vec![order()]);
        assert!(store.revision() > r0);
        let r1 = store.revision();
        store.clear();
        assert!(store.revision() > r1);
        assert!(store.orders().is_empty());
    }

    #[test]
    fn memo_recomputes_only_on_stale_revision() {
        let memo: Memo<usize> = Memo::new();
        let mut calls = 0usize;

        let v = memo.get_or_compute(1, || {
            calls += 1;
            42
        });
        assert_eq!(v, 42);

        // Same revision: cached, closure not called.
        let v = memo.get_or_compute(1, || {
            calls += 1;
            0
        });
        assert_eq!(v, 42);
        assert_eq!(calls, 1);

        // New revision: recomputed.
        let v = memo.get_or_compute(2, || {
            calls += 1;
            7
        });
        assert_eq!(v, 7);
        assert_eq!(calls, 2);
    }
}
