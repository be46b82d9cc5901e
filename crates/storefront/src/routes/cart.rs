//! Cart route handlers.
//!
//! Every read goes through reconciliation, so a cart that has accumulated
//! stale entries heals itself the first time anyone looks at it. The cleaned
//! cart is written back only when something was actually dropped.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use quitanda_core::ProductId;

use crate::cart::{self, CartLine, CartStore, Direction, SessionCartStore};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_price: Decimal,
    pub item_count: u64,
}

impl From<cart::Reconciled> for CartView {
    fn from(reconciled: cart::Reconciled) -> Self {
        Self {
            items: reconciled.items,
            total_price: reconciled.total_price,
            item_count: reconciled.item_count,
        }
    }
}

/// Load, reconcile, and (when entries were dropped) re-persist the visitor's
/// cart, returning the display view.
pub(crate) async fn cart_view(state: &AppState, session: &Session) -> Result<CartView> {
    let store = SessionCartStore::new(session);
    let raw = store.load().await?;

    let reconciled = cart::reconcile(&raw, |id| state.records().product(id));
    if reconciled.changed {
        store.save(&reconciled.cleaned).await?;
    }

    Ok(CartView::from(reconciled))
}

/// Request body naming a single product.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub product_id: i32,
}

/// Request body for quantity adjustment.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: i32,
    /// `"increase"` or `"decrease"`; anything else is a no-op.
    pub action: String,
}

/// Response carrying a notice plus the refreshed cart.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: CartView,
}

/// Show the visitor's cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    Ok(Json(cart_view(&state, &session).await?))
}

/// Add one unit of a product to the cart.
///
/// The product must exist in the record store; asking for an unknown one is
/// a 404, not a silent insert.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CartItemRequest>,
) -> Result<Json<CartResponse>> {
    let product = state
        .records()
        .product(ProductId::new(req.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", req.product_id)))?;

    let store = SessionCartStore::new(&session);
    let mut raw = store.load().await?;
    cart::mutate::add(&mut raw, product.id, 1);
    store.save(&raw).await?;

    let cart = cart_view(&state, &session).await?;
    Ok(Json(CartResponse {
        message: format!("\"{}\" added to cart.", product.name),
        cart,
    }))
}

/// Remove a product from the cart entirely.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CartItemRequest>,
) -> Result<Json<CartResponse>> {
    let store = SessionCartStore::new(&session);
    let mut raw = store.load().await?;

    if cart::mutate::remove(&mut raw, ProductId::new(req.product_id)) {
        store.save(&raw).await?;
    }

    let cart = cart_view(&state, &session).await?;
    Ok(Json(CartResponse {
        message: "Item removed from cart.".to_owned(),
        cart,
    }))
}

/// Step a product's quantity up or down.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    let store = SessionCartStore::new(&session);
    let mut raw = store.load().await?;

    if let Some(direction) = Direction::parse(&req.action) {
        cart::mutate::adjust(&mut raw, ProductId::new(req.product_id), direction);
        store.save(&raw).await?;
    }

    let cart = cart_view(&state, &session).await?;
    Ok(Json(CartResponse {
        message: "Cart updated.".to_owned(),
        cart,
    }))
}
