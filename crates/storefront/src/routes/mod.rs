//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Product listing plus the visitor's cart
//! GET  /health                  - Health check (registered in main)
//!
//! # Cart (session-backed)
//! GET  /cart                    - Show the reconciled cart
//! POST /cart/add                - Add one unit of a product
//! POST /cart/remove             - Remove a product entirely
//! POST /cart/update             - Step a quantity up or down
//!
//! # Checkout
//! GET  /checkout                - Checkout page data
//! POST /checkout                - Finalize the order
//!
//! # Auth / session
//! POST /auth/register           - Create an identity-linked customer and sign in
//! POST /auth/login              - Sign in an existing identity
//! POST /auth/logout             - Sign out (flushes the session)
//! GET  /clear-session           - Debug utility: flush the whole session
//!
//! # Demo API (process-wide state, separate from the session flow)
//! GET    /api/products/         - Catalog, read fresh from disk
//! GET    /api/cart/{user_id}/   - List a user's demo cart
//! POST   /api/cart/{user_id}/   - Add an item (merges by product id)
//! DELETE /api/cart/{user_id}/   - Remove an item
//! POST   /api/checkout/{user_id}/ - Place a demo order
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// A user-facing notice, flash-message style.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    /// Build a notice from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/update", post(cart::update))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the demo API router.
///
/// The demo surface is API-only and browser clients live elsewhere, so it
/// gets a permissive CORS layer.
pub fn demo_api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products/",
            get(api::products).fallback(api::method_not_allowed),
        )
        .route(
            "/cart/{user_id}/",
            get(api::cart_show)
                .post(api::cart_add)
                .delete(api::cart_remove)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/checkout/{user_id}/",
            post(api::checkout).fallback(api::method_not_allowed),
        )
        .layer(CorsLayer::permissive())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product listing
        .route("/", get(products::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Auth routes
        .nest("/auth", auth_routes())
        // Session debug utility
        .route("/clear-session", get(auth::clear_session))
        // Demo API
        .nest("/api", demo_api_routes())
}
