//! Checkout route handlers.
//!
//! The POST path runs the finalizer against the reconciled cart. Its two
//! precondition failures map differently on the wire: an empty cart is a
//! notice (the visitor just gets sent back to the shop), invalid shipping
//! details are a 400 so the client re-presents the form.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use quitanda_core::OrderId;

use crate::cart::{self, CartStore, SessionCartStore};
use crate::checkout::{CheckoutError, CustomerSource, ShippingForm, finalize};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::routes::Notice;
use crate::routes::cart::{CartView, cart_view};
use crate::state::AppState;

/// Checkout page data.
#[derive(Debug, Serialize)]
pub struct CheckoutPage {
    pub cart: CartView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub message: String,
    pub order_id: OrderId,
    pub transaction_id: String,
    pub total: Decimal,
}

/// Show the checkout page data.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutPage>> {
    let cart = cart_view(&state, &session).await?;
    let message = cart
        .items
        .is_empty()
        .then(|| "Your cart is empty.".to_owned());

    Ok(Json(CheckoutPage { cart, message }))
}

/// Finalize the checkout.
///
/// On success the whole session cart is cleared, not just the lines that
/// made it into the order.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Json(form): Json<ShippingForm>,
) -> Result<Response> {
    let store = SessionCartStore::new(&session);
    let raw = store.load().await?;

    let reconciled = cart::reconcile(&raw, |id| state.records().product(id));
    if reconciled.changed {
        store.save(&reconciled.cleaned).await?;
    }

    let source = current.map_or(CustomerSource::Guest, |c| CustomerSource::Authenticated(c.id));

    match finalize(state.records(), &reconciled.items, source, &form) {
        Ok(order) => {
            store.clear().await?;

            let receipt = CheckoutReceipt {
                message: "Your order has been placed.".to_owned(),
                order_id: order.id,
                transaction_id: order.transaction_id.unwrap_or_default(),
                total: reconciled.total_price,
            };
            Ok(Json(receipt).into_response())
        }
        Err(CheckoutError::EmptyCart) => Ok((
            StatusCode::OK,
            Json(Notice::new("Your cart is empty.")),
        )
            .into_response()),
        Err(err @ CheckoutError::InvalidShipping(_)) => {
            Err(AppError::BadRequest(err.to_string()))
        }
    }
}
