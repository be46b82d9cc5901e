//! The visitor cart engine.
//!
//! A cart is a small insertion-ordered mapping from product key (the product
//! ID rendered as a string) to a requested quantity. The engine is split into
//! pure pieces that only ever touch a cart value passed to them:
//!
//! - [`mutate`] - add / remove / adjust operations
//! - [`reconcile`](reconcile()) - validate a raw cart against the product
//!   records and price it
//! - [`store`] - persistence backends ([`CartStore`]) that load and save
//!   cart values; one per flow
//!
//! Nothing in here reaches into a session or a global map directly; callers
//! load a cart, run the pure operations, and persist the result.

pub mod mutate;
pub mod reconcile;
pub mod store;

pub use mutate::Direction;
pub use reconcile::{CartLine, Reconciled, reconcile};
pub use store::{CartStore, MemoryCartStore, SessionCartStore};

use serde::{Deserialize, Serialize};

/// One cart entry: a product key and a requested quantity.
///
/// The key is kept in its raw string form. Keys that do not parse back into
/// a product ID can exist here transiently; reconciliation removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: String,
    /// Requested quantity; a missing value reads as 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// A visitor's cart.
///
/// Behaves as a mapping with unique keys, but keeps insertion order: items
/// show up in the order the visitor added them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCart {
    entries: Vec<CartEntry>,
}

impl SessionCart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// True when the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct entries (not the summed quantity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Quantity recorded for a key, if present.
    #[must_use]
    pub fn quantity_of(&self, key: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.product_id == key)
            .map(|e| e.quantity)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Mutable access to the entry for `key`.
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == key)
    }

    /// Insert a fresh entry at the end, or overwrite the quantity of an
    /// existing one in place.
    pub fn insert(&mut self, key: String, quantity: u32) {
        if let Some(entry) = self.entry_mut(&key) {
            entry.quantity = quantity;
        } else {
            self.entries.push(CartEntry {
                product_id: key,
                quantity,
            });
        }
    }

    /// Remove the entry for `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != key);
        self.entries.len() != before
    }
}

impl<'a> IntoIterator for &'a SessionCart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_insertion_order() {
        let mut cart = SessionCart::new();
        cart.insert("3".to_owned(), 1);
        cart.insert("1".to_owned(), 2);
        cart.insert("2".to_owned(), 1);

        let keys: Vec<&str> = cart.iter().map(|e| e.product_id.as_str()).collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_insert_existing_overwrites_in_place() {
        let mut cart = SessionCart::new();
        cart.insert("3".to_owned(), 1);
        cart.insert("1".to_owned(), 1);
        cart.insert("3".to_owned(), 5);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of("3"), Some(5));
        let keys: Vec<&str> = cart.iter().map(|e| e.product_id.as_str()).collect();
        assert_eq!(keys, vec!["3", "1"]);
    }

    #[test]
    fn test_remove() {
        let mut cart = SessionCart::new();
        cart.insert("7".to_owned(), 1);

        assert!(cart.remove("7"));
        assert!(!cart.remove("7"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_entry_quantity_defaults_to_one() {
        // A stored entry missing its quantity reads back as quantity 1.
        let cart: SessionCart =
            serde_json::from_str(r#"[{"product_id": "4"}]"#).unwrap();
        assert_eq!(cart.quantity_of("4"), Some(1));
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let mut cart = SessionCart::new();
        cart.insert("9".to_owned(), 2);
        cart.insert("4".to_owned(), 1);

        let json = serde_json::to_string(&cart).unwrap();
        let parsed: SessionCart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }
}
