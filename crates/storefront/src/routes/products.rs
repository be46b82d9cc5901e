//! Product listing route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::Product;
use crate::routes::cart::{CartView, cart_view};
use crate::state::AppState;

/// Landing page data: the catalog plus the visitor's cart.
#[derive(Debug, Serialize)]
pub struct StorefrontPage {
    pub products: Vec<Product>,
    pub cart: CartView,
}

/// List products, newest first, with the reconciled cart alongside.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<StorefrontPage>> {
    let products = state.records().products_newest_first();
    let cart = cart_view(&state, &session).await?;

    Ok(Json(StorefrontPage { products, cart }))
}
