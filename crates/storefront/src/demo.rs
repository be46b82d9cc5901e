//! Process-wide state for the demo API.
//!
//! The demo flow is a deliberately separate surface: carts are keyed by a
//! caller-supplied user id in a process-local map, orders accumulate in a
//! process-local list, and none of it touches the storefront's session carts
//! or the record store. Everything here is lost on restart.

use parking_lot::RwLock;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use quitanda_core::ProductId;

use crate::cart::{CartLine, MemoryCartStore};

/// Inclusive bounds for demo order numbers.
const ORDER_NUMBER_MIN: u32 = 10_000;
const ORDER_NUMBER_MAX: u32 = 99_999;

/// A cart line as the demo API serves it.
#[derive(Debug, Clone, Serialize)]
pub struct DemoCartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

impl From<&CartLine> for DemoCartItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id,
            name: line.product.name.clone(),
            price: line.product.price.amount(),
            quantity: line.quantity,
            image: line.product.image.clone(),
        }
    }
}

/// Contact details captured by the demo checkout.
#[derive(Debug, Clone, Serialize)]
pub struct DemoCustomer {
    pub name: String,
    pub email: String,
    pub address: String,
    pub payment_method: String,
}

/// A placed demo order.
#[derive(Debug, Clone, Serialize)]
pub struct DemoOrder {
    pub order_number: u32,
    pub user_id: String,
    pub customer: DemoCustomer,
    pub items: Vec<DemoCartItem>,
    pub total: Decimal,
}

/// Process-wide demo state: per-user carts plus the order log.
#[derive(Debug, Default)]
pub struct DemoState {
    carts: MemoryCartStore,
    orders: RwLock<Vec<DemoOrder>>,
}

impl DemoState {
    /// Create empty demo state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo cart store.
    #[must_use]
    pub const fn carts(&self) -> &MemoryCartStore {
        &self.carts
    }

    /// Record an order, assigning it a free five-digit order number.
    ///
    /// Number allocation and the append happen under one write lock, so two
    /// concurrent checkouts cannot land on the same number.
    pub fn place_order(
        &self,
        user_id: &str,
        customer: DemoCustomer,
        items: Vec<DemoCartItem>,
        total: Decimal,
    ) -> DemoOrder {
        let mut orders = self.orders.write();
        let order_number = next_order_number(&orders);

        let order = DemoOrder {
            order_number,
            user_id: user_id.to_owned(),
            customer,
            items,
            total,
        };
        orders.push(order.clone());

        tracing::info!(order_number, total = %order.total, "demo order placed");
        order
    }

    /// Number of orders placed since startup.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.read().len()
    }
}

/// Pick a five-digit order number not already taken.
fn next_order_number(orders: &[DemoOrder]) -> u32 {
    let mut rng = rand::rng();
    loop {
        let candidate = rng.random_range(ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX);
        if orders.iter().all(|o| o.order_number != candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn customer() -> DemoCustomer {
        DemoCustomer {
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            address: "1 Market Street".to_owned(),
            payment_method: "card".to_owned(),
        }
    }

    #[test]
    fn test_order_numbers_are_five_digits() {
        let demo = DemoState::new();
        for _ in 0..20 {
            let order = demo.place_order("u1", customer(), Vec::new(), Decimal::ZERO);
            assert!((ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX).contains(&order.order_number));
        }
    }

    #[test]
    fn test_order_numbers_are_unique() {
        let demo = DemoState::new();
        let numbers: HashSet<u32> = (0..100)
            .map(|_| {
                demo.place_order("u1", customer(), Vec::new(), Decimal::ZERO)
                    .order_number
            })
            .collect();

        assert_eq!(numbers.len(), 100);
        assert_eq!(demo.order_count(), 100);
    }
}
