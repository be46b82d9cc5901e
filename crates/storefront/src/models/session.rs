//! Session-related types.
//!
//! Types stored in the session to carry visitor state between requests.

use serde::{Deserialize, Serialize};

use quitanda_core::{CustomerId, Email};

/// Session-stored customer identity.
///
/// Minimal data stored in the session to identify the signed-in customer.
/// Credential verification happens upstream in the identity provider; by the
/// time this is set, the visitor is authenticated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// The customer record linked to the authenticated identity.
    pub id: CustomerId,
    /// The customer's email address.
    pub email: Email,
}

/// Session keys for visitor state.
pub mod session_keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the signed-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}
