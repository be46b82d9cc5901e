//! Authentication extractor and session helpers.
//!
//! The identity provider that verifies credentials sits outside this
//! service; by the time a request reaches a handler, the only authentication
//! fact that matters is whether the session carries a [`CurrentCustomer`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentCustomer, session_keys};

/// Extractor that optionally gets the signed-in customer.
///
/// Never rejects the request; guests extract as `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(customer): OptionalAuth,
/// ) -> impl IntoResponse {
///     match customer {
///         Some(c) => format!("Hello, {}!", c.email),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentCustomer>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let customer = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentCustomer>(session_keys::CURRENT_CUSTOMER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(customer))
    }
}

/// Store the signed-in customer in the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn set_current_customer(
    session: &Session,
    customer: &CurrentCustomer,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_CUSTOMER, customer)
        .await
}
