//! Auth and session route handlers.
//!
//! Credential verification belongs to the external identity provider; these
//! handlers own what happens around it - creating the identity-linked
//! customer record at registration, carrying the sign-in in the session, and
//! honouring remember-me by switching the session between browser-session
//! and two-week expiry.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::{Expiry, Session};
use tracing::instrument;

use quitanda_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, SESSION_EXPIRY_SECONDS, set_current_customer};
use crate::models::CurrentCustomer;
use crate::routes::Notice;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Response for a successful sign-in or registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub customer: CurrentCustomer,
}

/// Register a new customer and sign the visitor in.
///
/// Creates the customer record linked to a freshly allocated identity. A
/// visitor who is already signed in just gets their current identity back.
#[instrument(skip(state, session))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    if let Some(customer) = current {
        return Ok(Json(AuthResponse {
            message: "Already signed in.".to_owned(),
            customer,
        }));
    }

    let email =
        Email::parse(req.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user_id = state.records().allocate_user_id();
    let customer = state
        .records()
        .create_customer(Some(user_id), req.name, Some(email.clone()));

    let current = CurrentCustomer {
        id: customer.id,
        email,
    };
    set_current_customer(&session, &current).await?;

    Ok(Json(AuthResponse {
        message: "Registration successful.".to_owned(),
        customer: current,
    }))
}

/// Sign in an existing identity.
///
/// Without remember-me the session lasts until the browser closes; with it,
/// the full two weeks.
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email =
        Email::parse(req.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let customer = state
        .records()
        .customer_by_identity_email(&email)
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_owned()))?;

    let current = CurrentCustomer {
        id: customer.id,
        email,
    };
    set_current_customer(&session, &current).await?;

    if req.remember_me {
        session.set_expiry(Some(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        )));
    } else {
        session.set_expiry(Some(Expiry::OnSessionEnd));
    }

    let greeting = customer
        .name
        .unwrap_or_else(|| current.email.as_str().to_owned());
    Ok(Json(AuthResponse {
        message: format!("Welcome back, {greeting}!"),
        customer: current,
    }))
}

/// Sign the visitor out, flushing the whole session (cart included).
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Notice>> {
    session.flush().await?;

    Ok(Json(Notice::new("You have been signed out.")))
}

/// Debug utility: flush the entire session.
#[instrument(skip(session))]
pub async fn clear_session(session: Session) -> Result<Json<Notice>> {
    session.flush().await?;

    Ok(Json(Notice::new("Session cleared.")))
}
