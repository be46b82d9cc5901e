//! Cart mutation operations.
//!
//! All three operations are synchronous and side-effect only the cart value
//! they are handed; persisting the mutated cart is the caller's job. None of
//! them consult the product records: an ID that no longer resolves is
//! allowed in here and gets dropped by the next reconciliation instead.

use quitanda_core::ProductId;

use super::SessionCart;

/// Quantity-adjustment direction for [`adjust`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// Parse the wire form (`"increase"` / `"decrease"`).
    ///
    /// Unknown strings yield `None`; callers treat that as a no-op.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            _ => None,
        }
    }
}

/// Add `quantity` units of a product to the cart.
///
/// An existing entry has its quantity incremented; otherwise a fresh entry
/// is appended. The storefront flow always adds one unit at a time; the demo
/// API passes the client-supplied quantity through.
pub fn add(cart: &mut SessionCart, product_id: ProductId, quantity: u32) {
    let key = product_id.as_key();
    if let Some(entry) = cart.entry_mut(&key) {
        entry.quantity = entry.quantity.saturating_add(quantity);
    } else {
        cart.insert(key, quantity);
    }
}

/// Remove a product from the cart entirely.
///
/// Returns whether an entry was removed; an absent key is a quiet no-op.
pub fn remove(cart: &mut SessionCart, product_id: ProductId) -> bool {
    cart.remove(&product_id.as_key())
}

/// Step a product's quantity up or down by one.
///
/// A decrease that reaches zero removes the entry outright; carts never hold
/// zero-or-negative quantities. An absent key is a no-op.
pub fn adjust(cart: &mut SessionCart, product_id: ProductId, direction: Direction) {
    let key = product_id.as_key();
    let Some(entry) = cart.entry_mut(&key) else {
        return;
    };

    match direction {
        Direction::Increase => entry.quantity = entry.quantity.saturating_add(1),
        Direction::Decrease => {
            entry.quantity = entry.quantity.saturating_sub(1);
            if entry.quantity == 0 {
                cart.remove(&key);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_inserts_with_quantity_one() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(7), 1);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of("7"), Some(1));
    }

    #[test]
    fn test_add_increments_existing() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(7), 1);
        add(&mut cart, ProductId::new(7), 1);

        assert_eq!(cart.quantity_of("7"), Some(2));
    }

    #[test]
    fn test_add_merges_client_quantity() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(2), 3);
        add(&mut cart, ProductId::new(2), 2);

        assert_eq!(cart.quantity_of("2"), Some(5));
    }

    #[test]
    fn test_remove_present_and_absent() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(7), 1);

        assert!(remove(&mut cart, ProductId::new(7)));
        assert!(!remove(&mut cart, ProductId::new(7)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_increase() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(7), 1);
        adjust(&mut cart, ProductId::new(7), Direction::Increase);

        assert_eq!(cart.quantity_of("7"), Some(2));
    }

    #[test]
    fn test_adjust_decrease_to_zero_removes_entry() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(7), 1);
        adjust(&mut cart, ProductId::new(7), Direction::Decrease);

        assert_eq!(cart.quantity_of("7"), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_unknown_key_is_noop() {
        let mut cart = SessionCart::new();
        add(&mut cart, ProductId::new(7), 1);
        adjust(&mut cart, ProductId::new(99), Direction::Decrease);

        assert_eq!(cart.quantity_of("7"), Some(1));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("increase"), Some(Direction::Increase));
        assert_eq!(Direction::parse("decrease"), Some(Direction::Decrease));
        assert_eq!(Direction::parse("double"), None);
        assert_eq!(Direction::parse(""), None);
    }
}
