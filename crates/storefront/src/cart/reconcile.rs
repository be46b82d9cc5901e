//! Cart reconciliation: the self-healing cart read.
//!
//! Session carts accumulate junk over time - keys that never were product
//! IDs, or IDs whose product has since been deleted. Reconciliation walks
//! the raw cart once, prices every entry it can still vouch for, and hands
//! back a cleaned cart with the junk dropped. Validation failures are never
//! surfaced as errors; a bad entry simply stops existing.

use rust_decimal::Decimal;
use serde::Serialize;

use quitanda_core::ProductId;

use crate::models::Product;

use super::SessionCart;

/// A validated, priced cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    /// `product.price` times `quantity`, exact.
    pub line_total: Decimal,
}

/// The result of reconciling a raw cart against the product records.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Lines that survived validation, in cart insertion order.
    pub items: Vec<CartLine>,
    /// Sum of line totals over `items`.
    pub total_price: Decimal,
    /// Summed quantity over the RAW cart, dropped entries included. The
    /// badge count a visitor saw before this read can therefore briefly
    /// exceed what `items` holds.
    pub item_count: u64,
    /// The raw cart minus every entry that failed validation.
    pub cleaned: SessionCart,
    /// Whether `cleaned` differs from the raw cart. Callers persist the
    /// cleaned cart only when this is set, to avoid needless writes.
    pub changed: bool,
}

/// Reconcile a raw cart against the product records.
///
/// For each entry in insertion order: parse the key as a product ID and
/// resolve it via `lookup`. Entries failing either step are marked for
/// removal and contribute no line. Surviving entries are priced with exact
/// decimal arithmetic.
pub fn reconcile<F>(raw: &SessionCart, mut lookup: F) -> Reconciled
where
    F: FnMut(ProductId) -> Option<Product>,
{
    let mut items = Vec::new();
    let mut total_price = Decimal::ZERO;
    let mut stale_keys = Vec::new();

    for entry in raw {
        let product = ProductId::parse_key(&entry.product_id).and_then(&mut lookup);

        let Some(product) = product else {
            stale_keys.push(entry.product_id.clone());
            continue;
        };

        let line_total = product.price.line_total(entry.quantity);
        total_price += line_total;
        items.push(CartLine {
            product,
            quantity: entry.quantity,
            line_total,
        });
    }

    let item_count = raw.iter().map(|e| u64::from(e.quantity)).sum();

    let mut cleaned = raw.clone();
    for key in &stale_keys {
        cleaned.remove(key);
    }

    Reconciled {
        items,
        total_price,
        item_count,
        cleaned,
        changed: !stale_keys.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_PRODUCT_IMAGE;
    use chrono::Utc;
    use quitanda_core::Price;
    use std::collections::HashMap;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::new(price.parse::<Decimal>().unwrap()).unwrap(),
            image: DEFAULT_PRODUCT_IMAGE.to_owned(),
            stock: 1,
            created_at: Utc::now(),
        }
    }

    fn lookup_from(products: Vec<Product>) -> impl FnMut(ProductId) -> Option<Product> {
        let by_id: HashMap<ProductId, Product> =
            products.into_iter().map(|p| (p.id, p)).collect();
        move |id| by_id.get(&id).cloned()
    }

    #[test]
    fn test_valid_entries_survive_in_order() {
        let mut cart = SessionCart::new();
        cart.insert("2".to_owned(), 1);
        cart.insert("1".to_owned(), 3);

        let result = reconcile(&cart, lookup_from(vec![product(1, "1.00"), product(2, "2.00")]));

        let ids: Vec<i32> = result.items.iter().map(|l| l.product.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(!result.changed);
        assert_eq!(result.cleaned, cart);
    }

    #[test]
    fn test_invalid_keys_are_dropped_not_raised() {
        let mut cart = SessionCart::new();
        cart.insert("1".to_owned(), 2);
        cart.insert(String::new(), 1); // unparseable
        cart.insert("weird".to_owned(), 4); // unparseable
        cart.insert("99".to_owned(), 1); // no such product

        let result = reconcile(&cart, lookup_from(vec![product(1, "3.50")]));

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].product.id, ProductId::new(1));
        assert!(result.changed);
        assert_eq!(result.cleaned.len(), 1);
        assert_eq!(result.cleaned.quantity_of("1"), Some(2));
    }

    #[test]
    fn test_total_price_is_exact_decimal() {
        let mut cart = SessionCart::new();
        cart.insert("1".to_owned(), 2);
        cart.insert("2".to_owned(), 1);

        let result = reconcile(
            &cart,
            lookup_from(vec![product(1, "19.99"), product(2, "5.00")]),
        );

        assert_eq!(result.total_price, Decimal::new(4498, 2));
        assert_eq!(result.total_price.to_string(), "44.98");
    }

    #[test]
    fn test_line_totals() {
        let mut cart = SessionCart::new();
        cart.insert("1".to_owned(), 3);

        let result = reconcile(&cart, lookup_from(vec![product(1, "2.50")]));

        assert_eq!(result.items[0].line_total, Decimal::new(750, 2));
    }

    #[test]
    fn test_item_count_sums_raw_cart_including_dropped() {
        let mut cart = SessionCart::new();
        cart.insert("1".to_owned(), 2);
        cart.insert("99".to_owned(), 5); // dropped, still counted

        let result = reconcile(&cart, lookup_from(vec![product(1, "1.00")]));

        assert_eq!(result.item_count, 7);
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn test_empty_cart() {
        let result = reconcile(&SessionCart::new(), lookup_from(vec![]));

        assert!(result.items.is_empty());
        assert_eq!(result.total_price, Decimal::ZERO);
        assert_eq!(result.item_count, 0);
        assert!(!result.changed);
    }
}
