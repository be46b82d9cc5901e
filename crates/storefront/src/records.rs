//! In-memory record store.
//!
//! Stands in for the external record store that owns products, customers,
//! orders, and order items. Product writes happen through an administrative
//! surface elsewhere; this service only reads them, so the store is seeded
//! once at startup and treated as read-only for products afterwards.
//!
//! All tables live behind a single `parking_lot::RwLock`, which is also the
//! transactional boundary: checkout's create-order/create-items/stamp
//! sequence runs inside one write-lock section and is observed either
//! entirely or not at all.

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use quitanda_core::{CustomerId, Email, OrderId, OrderItemId, ProductId, UserId};

use crate::cart::CartLine;
use crate::models::{Customer, Order, OrderItem, Product};

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    next_user_id: i32,
    next_customer_id: i32,
    next_order_id: i32,
    next_order_item_id: i32,
}

/// The record store, memory-backed.
#[derive(Debug, Default)]
pub struct MemoryRecords {
    tables: RwLock<Tables>,
}

impl MemoryRecords {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Replace the product table with a freshly loaded catalog.
    pub fn seed_products(&self, products: Vec<Product>) {
        self.tables.write().products = products;
    }

    /// Whether any products have been seeded.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        !self.tables.read().products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.tables
            .read()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// All products, newest first.
    #[must_use]
    pub fn products_newest_first(&self) -> Vec<Product> {
        let mut products = self.tables.read().products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Allocate a fresh identity ID for a registration.
    ///
    /// Identity records themselves (credentials and all) live with the
    /// external auth provider; we only hand out the link value.
    pub fn allocate_user_id(&self) -> UserId {
        let mut tables = self.tables.write();
        tables.next_user_id += 1;
        UserId::new(tables.next_user_id)
    }

    /// Create a customer record.
    pub fn create_customer(
        &self,
        user_id: Option<UserId>,
        name: Option<String>,
        email: Option<Email>,
    ) -> Customer {
        let mut tables = self.tables.write();
        tables.next_customer_id += 1;
        let customer = Customer {
            id: CustomerId::new(tables.next_customer_id),
            user_id,
            name,
            email,
        };
        tables.customers.push(customer.clone());
        customer
    }

    /// Look up a customer by ID.
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.tables
            .read()
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Look up the identity-linked customer for an email, for sign-in.
    #[must_use]
    pub fn customer_by_identity_email(&self, email: &Email) -> Option<Customer> {
        self.tables
            .read()
            .customers
            .iter()
            .find(|c| c.user_id.is_some() && c.email.as_ref() == Some(email))
            .cloned()
    }

    /// Find a customer by email, creating a guest record if none exists.
    ///
    /// Lookup is by email alone, so repeat guest checkouts under one email
    /// land on the same customer record. Returns the customer and whether it
    /// was created by this call.
    pub fn get_or_create_customer_by_email(&self, email: &Email, name: &str) -> (Customer, bool) {
        let mut tables = self.tables.write();

        if let Some(existing) = tables
            .customers
            .iter()
            .find(|c| c.email.as_ref() == Some(email))
        {
            return (existing.clone(), false);
        }

        tables.next_customer_id += 1;
        let customer = Customer {
            id: CustomerId::new(tables.next_customer_id),
            user_id: None,
            name: Some(name.to_owned()),
            email: Some(email.clone()),
        };
        tables.customers.push(customer.clone());
        (customer, true)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Create an order and its items, stamp it, and mark it complete.
    ///
    /// Runs entirely inside one write-lock section: concurrent readers see
    /// either no trace of the order or the finished thing, never an order
    /// without its items or its transaction ID.
    pub fn create_completed_order(
        &self,
        customer_id: CustomerId,
        lines: &[CartLine],
        transaction_id: &str,
    ) -> Order {
        let mut tables = self.tables.write();

        tables.next_order_id += 1;
        let order_id = OrderId::new(tables.next_order_id);
        let mut order = Order {
            id: order_id,
            customer_id: Some(customer_id),
            date_ordered: Utc::now(),
            complete: false,
            transaction_id: None,
        };

        for line in lines {
            tables.next_order_item_id += 1;
            let order_item_id = OrderItemId::new(tables.next_order_item_id);
            tables.order_items.push(OrderItem {
                id: order_item_id,
                product_id: Some(line.product.id),
                order_id: Some(order_id),
                quantity: line.quantity,
                date_added: Utc::now(),
            });
        }

        order.transaction_id = Some(transaction_id.to_owned());
        order.complete = true;
        tables.orders.push(order.clone());
        order
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.tables.read().orders.iter().find(|o| o.id == id).cloned()
    }

    /// Items belonging to an order, in creation order.
    #[must_use]
    pub fn items_for_order(&self, order_id: OrderId) -> Vec<OrderItem> {
        self.tables
            .read()
            .order_items
            .iter()
            .filter(|i| i.order_id == Some(order_id))
            .cloned()
            .collect()
    }

    /// Derived order total: sum of item price times quantity.
    ///
    /// `None` when any item's product link no longer resolves; a detached
    /// line has no price to total against.
    #[must_use]
    pub fn order_total(&self, order_id: OrderId) -> Option<Decimal> {
        let tables = self.tables.read();

        let mut total = Decimal::ZERO;
        for item in tables.order_items.iter().filter(|i| i.order_id == Some(order_id)) {
            let product_id = item.product_id?;
            let product = tables.products.iter().find(|p| p.id == product_id)?;
            total += product.price.line_total(item.quantity);
        }
        Some(total)
    }

    /// Derived order item count: summed quantity over the order's items.
    #[must_use]
    pub fn order_item_count(&self, order_id: OrderId) -> u64 {
        self.tables
            .read()
            .order_items
            .iter()
            .filter(|i| i.order_id == Some(order_id))
            .map(|i| u64::from(i.quantity))
            .sum()
    }

    /// Total number of orders in the store.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.tables.read().orders.len()
    }

    /// Total number of order items in the store.
    #[must_use]
    pub fn order_item_total(&self) -> usize {
        self.tables.read().order_items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_PRODUCT_IMAGE;
    use chrono::{Duration, Utc};
    use quitanda_core::Price;

    fn product(id: i32, price: &str, age_days: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::new(price.parse::<Decimal>().unwrap()).unwrap(),
            image: DEFAULT_PRODUCT_IMAGE.to_owned(),
            stock: 1,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn line(product: Product, quantity: u32) -> CartLine {
        let line_total = product.price.line_total(quantity);
        CartLine {
            product,
            quantity,
            line_total,
        }
    }

    #[test]
    fn test_seed_and_lookup() {
        let records = MemoryRecords::new();
        assert!(!records.is_seeded());

        records.seed_products(vec![product(1, "2.00", 0)]);
        assert!(records.is_seeded());
        assert!(records.product(ProductId::new(1)).is_some());
        assert!(records.product(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_products_newest_first() {
        let records = MemoryRecords::new();
        records.seed_products(vec![
            product(1, "1.00", 3),
            product(2, "1.00", 1),
            product(3, "1.00", 2),
        ]);

        let ids: Vec<i32> = records
            .products_newest_first()
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_get_or_create_customer_merges_by_email() {
        let records = MemoryRecords::new();
        let email = Email::parse("guest@example.com").unwrap();

        let (first, created) = records.get_or_create_customer_by_email(&email, "First");
        assert!(created);

        let (second, created) = records.get_or_create_customer_by_email(&email, "Second");
        assert!(!created);
        assert_eq!(second.id, first.id);
        // The original name sticks; a later checkout does not rename the record.
        assert_eq!(second.name.as_deref(), Some("First"));
    }

    #[test]
    fn test_customer_by_identity_email_ignores_guests() {
        let records = MemoryRecords::new();
        let email = Email::parse("visitor@example.com").unwrap();

        records.create_customer(None, Some("Guest".to_owned()), Some(email.clone()));
        assert!(records.customer_by_identity_email(&email).is_none());

        let user_id = records.allocate_user_id();
        let registered = records.create_customer(
            Some(user_id),
            Some("Registered".to_owned()),
            Some(email.clone()),
        );
        assert_eq!(
            records.customer_by_identity_email(&email).unwrap().id,
            registered.id
        );
    }

    #[test]
    fn test_create_completed_order() {
        let records = MemoryRecords::new();
        let a = product(1, "19.99", 0);
        let b = product(2, "5.00", 0);
        records.seed_products(vec![a.clone(), b.clone()]);
        let customer = records.create_customer(None, None, None);

        let order = records.create_completed_order(
            customer.id,
            &[line(a, 2), line(b, 1)],
            "txn-123",
        );

        assert!(order.complete);
        assert_eq!(order.transaction_id.as_deref(), Some("txn-123"));
        assert_eq!(order.customer_id, Some(customer.id));
        assert_eq!(records.order_count(), 1);
        assert_eq!(records.items_for_order(order.id).len(), 2);
        assert_eq!(records.order_item_count(order.id), 3);
        assert_eq!(records.order_total(order.id), Some(Decimal::new(4498, 2)));
    }

    #[test]
    fn test_order_total_undefined_without_product() {
        let records = MemoryRecords::new();
        let a = product(1, "3.00", 0);
        records.seed_products(vec![a.clone()]);
        let customer = records.create_customer(None, None, None);
        let order = records.create_completed_order(customer.id, &[line(a, 1)], "txn");

        // Product deleted out from under the order.
        records.seed_products(vec![]);
        assert_eq!(records.order_total(order.id), None);
    }
}
