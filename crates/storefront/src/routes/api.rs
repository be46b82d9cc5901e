//! Demo JSON API route handlers.
//!
//! A parallel, simplified products/cart/checkout flow for API-only demos.
//! Carts are keyed by a caller-supplied user id in process-wide state (see
//! [`crate::demo`]) and the catalog file is read fresh on every call, so a
//! catalog edit is visible on the next request without a restart. Nothing
//! here is shared with the session-backed storefront flow.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quitanda_core::ProductId;

use crate::cart::{self, CartStore, Reconciled};
use crate::catalog;
use crate::demo::{DemoCartItem, DemoCustomer};
use crate::error::{AppError, ErrorBody, Result};
use crate::models::Product;
use crate::state::AppState;

/// Catalog response body.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// Cart listing response body.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Vec<DemoCartItem>,
}

/// Cart mutation response body.
#[derive(Debug, Serialize)]
pub struct CartMutationResponse {
    pub success: bool,
    pub cart: Vec<DemoCartItem>,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: i32,
}

/// Checkout request body. Fields are optional so that a missing one is a
/// clean 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub payment_method: Option<String>,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_number: u32,
    pub total: rust_decimal::Decimal,
    pub items: Vec<DemoCartItem>,
    pub message: String,
}

fn catalog_lookup(products: &[Product]) -> impl FnMut(ProductId) -> Option<Product> + '_ {
    move |id| products.iter().find(|p| p.id == id).cloned()
}

/// Reconcile a user's demo cart against the given catalog snapshot,
/// persisting the cleaned cart when entries were dropped.
async fn reconciled_cart(
    state: &AppState,
    user_id: &str,
    products: &[Product],
) -> Result<Reconciled> {
    let handle = state.demo().carts().scope(user_id);
    let raw = handle.load().await?;

    let reconciled = cart::reconcile(&raw, catalog_lookup(products));
    if reconciled.changed {
        handle.save(&reconciled.cleaned).await?;
    }

    Ok(reconciled)
}

fn item_views(reconciled: &Reconciled) -> Vec<DemoCartItem> {
    reconciled.items.iter().map(DemoCartItem::from).collect()
}

/// List the catalog.
///
/// GET /api/products/
#[instrument(skip(state))]
pub async fn products(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = catalog::load(&state.config().catalog_path).await?;
    Ok(Json(ProductsResponse { products }))
}

/// List a user's demo cart.
///
/// GET /api/cart/{user_id}/
#[instrument(skip(state))]
pub async fn cart_show(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>> {
    let products = catalog::load(&state.config().catalog_path).await?;
    let reconciled = reconciled_cart(&state, &user_id, &products).await?;

    Ok(Json(CartResponse {
        cart: item_views(&reconciled),
    }))
}

/// Add an item to a user's demo cart, merging by product id.
///
/// POST /api/cart/{user_id}/
#[instrument(skip(state))]
pub async fn cart_add(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartMutationResponse>> {
    let products = catalog::load(&state.config().catalog_path).await?;

    let product_id = ProductId::new(req.product_id);
    if !products.iter().any(|p| p.id == product_id) {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    let handle = state.demo().carts().scope(&user_id);
    let mut raw = handle.load().await?;
    cart::mutate::add(&mut raw, product_id, req.quantity.unwrap_or(1));
    handle.save(&raw).await?;

    let reconciled = reconciled_cart(&state, &user_id, &products).await?;
    Ok(Json(CartMutationResponse {
        success: true,
        cart: item_views(&reconciled),
    }))
}

/// Remove an item from a user's demo cart.
///
/// DELETE /api/cart/{user_id}/
#[instrument(skip(state))]
pub async fn cart_remove(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<RemoveItemRequest>,
) -> Result<Json<CartMutationResponse>> {
    let products = catalog::load(&state.config().catalog_path).await?;

    let handle = state.demo().carts().scope(&user_id);
    let mut raw = handle.load().await?;
    cart::mutate::remove(&mut raw, ProductId::new(req.product_id));
    handle.save(&raw).await?;

    let reconciled = reconciled_cart(&state, &user_id, &products).await?;
    Ok(Json(CartMutationResponse {
        success: true,
        cart: item_views(&reconciled),
    }))
}

/// Place a demo order.
///
/// POST /api/checkout/{user_id}/
///
/// Requires name, email, address, and payment method; missing any of them is
/// a 400, as is checking out an empty cart.
#[instrument(skip(state, req))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let (Some(name), Some(email), Some(address), Some(payment_method)) =
        (req.name, req.email, req.address, req.payment_method)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_owned()));
    };

    let products = catalog::load(&state.config().catalog_path).await?;
    let reconciled = reconciled_cart(&state, &user_id, &products).await?;
    if reconciled.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_owned()));
    }

    let items = item_views(&reconciled);
    let order = state.demo().place_order(
        &user_id,
        DemoCustomer {
            name,
            email,
            address,
            payment_method,
        },
        items,
        reconciled.total_price,
    );

    state.demo().carts().scope(&user_id).clear().await?;

    Ok(Json(CheckoutResponse {
        success: true,
        order_number: order.order_number,
        total: order.total,
        items: order.items,
        message: "Order confirmed.".to_owned(),
    }))
}

/// Fallback for unsupported methods on demo API routes.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Invalid request method")),
    )
}
