//! Domain models for the storefront.
//!
//! Products are read-only from this service's perspective: they are created
//! and edited through an administrative surface that lives elsewhere. Orders
//! and order items are written exactly once, at checkout finalization.

pub mod session;

pub use session::{CurrentCustomer, session_keys};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quitanda_core::{CustomerId, Email, OrderId, OrderItemId, Price, ProductId, UserId};

/// Image path used when a product was created without one.
pub const DEFAULT_PRODUCT_IMAGE: &str = "products/default.png";

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default = "default_product_image")]
    pub image: String,
    #[serde(default = "default_stock")]
    pub stock: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_product_image() -> String {
    DEFAULT_PRODUCT_IMAGE.to_owned()
}

const fn default_stock() -> u32 {
    1
}

/// A customer, who may or may not hold a registered identity.
///
/// Guests have no `user_id` and are identified by email at checkout time.
/// At most one customer exists per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<Email>,
}

/// A placed order.
///
/// `customer_id` is kept nullable: deleting a customer detaches their orders
/// rather than cascading into them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub date_ordered: DateTime<Utc>,
    pub complete: bool,
    pub transaction_id: Option<String>,
}

/// A single line of an order.
///
/// Both links are nullable for the same detach-on-delete reason as
/// [`Order::customer_id`]. A line whose product link is gone has no price to
/// total against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub quantity: u32,
    pub date_added: DateTime<Utc>,
}
