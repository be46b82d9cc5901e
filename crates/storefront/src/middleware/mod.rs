//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, set_current_customer};
pub use session::{SESSION_EXPIRY_SECONDS, create_session_layer};
