//! Checkout finalization.
//!
//! Turns a reconciled cart into a persisted order. The two failure modes are
//! user-facing notices, not faults: an empty cart sends the visitor back to
//! the shop, bad shipping details re-present the form. Nothing is written to
//! the record store on either path.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use quitanda_core::{CustomerId, Email};

use crate::cart::CartLine;
use crate::models::{Customer, Order};
use crate::records::MemoryRecords;

/// Checkout precondition failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("cart is empty")]
    EmptyCart,
    /// Shipping details are missing or malformed.
    #[error("invalid shipping details: {0}")]
    InvalidShipping(String),
}

/// Shipping details as submitted by the visitor.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingForm {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Who is checking out.
#[derive(Debug, Clone, Copy)]
pub enum CustomerSource {
    /// A signed-in visitor; the session carries their customer ID.
    Authenticated(CustomerId),
    /// A guest, identified by the email on the shipping form.
    Guest,
}

fn validate_shipping(form: &ShippingForm) -> Result<(String, Email), CheckoutError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(CheckoutError::InvalidShipping("name is required".to_owned()));
    }

    let email = Email::parse(form.email.trim())
        .map_err(|e| CheckoutError::InvalidShipping(e.to_string()))?;

    if form.address.trim().is_empty() {
        return Err(CheckoutError::InvalidShipping(
            "address is required".to_owned(),
        ));
    }

    Ok((name.to_owned(), email))
}

fn resolve_customer(
    records: &MemoryRecords,
    source: CustomerSource,
    name: &str,
    email: &Email,
) -> Customer {
    if let CustomerSource::Authenticated(id) = source
        && let Some(customer) = records.customer(id)
    {
        return customer;
    }

    // Guests merge by email alone; a stale signed-in session degrades to the
    // same path rather than failing the checkout.
    let (customer, _created) = records.get_or_create_customer_by_email(email, name);
    customer
}

/// Finalize a checkout: resolve the customer, persist the order and its
/// items, and stamp a transaction ID.
///
/// The order, its items, and the completion stamp commit atomically in the
/// record store. Clearing the visitor's cart is the caller's job, after this
/// returns.
///
/// # Errors
///
/// [`CheckoutError::EmptyCart`] when `items` is empty,
/// [`CheckoutError::InvalidShipping`] when the form fails validation. No
/// record-store write happens on either.
pub fn finalize(
    records: &MemoryRecords,
    items: &[CartLine],
    source: CustomerSource,
    form: &ShippingForm,
) -> Result<Order, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let (name, email) = validate_shipping(form)?;
    let customer = resolve_customer(records, source, &name, &email);

    let transaction_id = Uuid::new_v4().to_string();
    let order = records.create_completed_order(customer.id, items, &transaction_id);

    tracing::info!(
        order_id = %order.id,
        customer_id = %customer.id,
        lines = items.len(),
        "order finalized"
    );

    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_PRODUCT_IMAGE, Product};
    use chrono::Utc;
    use quitanda_core::{Price, ProductId};
    use rust_decimal::Decimal;

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

    fn line(product: Product, quantity: u32) -> CartLine {
        let line_total = product.price.line_total(quantity);
        CartLine {
            product,
            quantity,
            line_total,
        }
    }

    fn shipping() -> ShippingForm {
        ShippingForm {
            name: "Ana Visitor".to_owned(),
            email: "ana@example.com".to_owned(),
            address: "1 Market Street".to_owned(),
        }
    }

    #[test]
    fn test_empty_cart_writes_nothing() {
        let records = MemoryRecords::new();

        let result = finalize(&records, &[], CustomerSource::Guest, &shipping());

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert_eq!(records.order_count(), 0);
        assert_eq!(records.order_item_total(), 0);
    }

    #[test]
    fn test_invalid_shipping_writes_nothing() {
        let records = MemoryRecords::new();
        let items = [line(product(1, "2.00"), 1)];

        for form in [
            ShippingForm {
                name: "  ".to_owned(),
                ..shipping()
            },
            ShippingForm {
                email: "not-an-email".to_owned(),
                ..shipping()
            },
            ShippingForm {
                address: String::new(),
                ..shipping()
            },
        ] {
            let result = finalize(&records, &items, CustomerSource::Guest, &form);
            assert!(matches!(result, Err(CheckoutError::InvalidShipping(_))));
        }

        assert_eq!(records.order_count(), 0);
    }

    #[test]
    fn test_finalize_creates_order_and_items() {
        let records = MemoryRecords::new();
        let items = [line(product(1, "19.99"), 2), line(product(2, "5.00"), 1)];

        let order = finalize(&records, &items, CustomerSource::Guest, &shipping()).unwrap();

        assert!(order.complete);
        assert!(order.transaction_id.is_some());
        assert_eq!(records.order_count(), 1);
        assert_eq!(records.items_for_order(order.id).len(), 2);
    }

    #[test]
    fn test_guest_checkouts_merge_by_email() {
        let records = MemoryRecords::new();
        let items = [line(product(1, "2.00"), 1)];

        let first = finalize(&records, &items, CustomerSource::Guest, &shipping()).unwrap();
        let second = finalize(&records, &items, CustomerSource::Guest, &shipping()).unwrap();

        assert_eq!(first.customer_id, second.customer_id);
        assert_eq!(records.order_count(), 2);
    }

    #[test]
    fn test_authenticated_source_uses_linked_customer() {
        let records = MemoryRecords::new();
        let user_id = records.allocate_user_id();
        let customer = records.create_customer(
            Some(user_id),
            Some("Registered".to_owned()),
            Some(Email::parse("reg@example.com").unwrap()),
        );
        let items = [line(product(1, "2.00"), 1)];

        // Shipping email differs from the account email; the linked customer
        // still wins on the authenticated path.
        let order = finalize(
            &records,
            &items,
            CustomerSource::Authenticated(customer.id),
            &shipping(),
        )
        .unwrap();

        assert_eq!(order.customer_id, Some(customer.id));
    }

    #[test]
    fn test_stale_authenticated_session_degrades_to_guest() {
        let records = MemoryRecords::new();
        let items = [line(product(1, "2.00"), 1)];

        let order = finalize(
            &records,
            &items,
            CustomerSource::Authenticated(quitanda_core::CustomerId::new(999)),
            &shipping(),
        )
        .unwrap();

        let customer_id = order.customer_id.unwrap();
        let customer = records.customer(customer_id).unwrap();
        assert_eq!(customer.email.unwrap().as_str(), "ana@example.com");
        assert!(customer.user_id.is_none());
    }
}
