//! Cart persistence backends.
//!
//! Two flows share the cart engine but persist carts differently: the
//! storefront keeps each visitor's cart in their cookie session, while the
//! demo API keeps carts in a process-local map keyed by a caller-supplied
//! user id. [`CartStore`] is the seam between them; handlers load a cart,
//! run the pure operations from this module's siblings, and save the result
//! through the same interface regardless of backend.

use std::collections::HashMap;
use std::convert::Infallible;

use parking_lot::RwLock;
use tower_sessions::Session;

use crate::models::session_keys;

use super::SessionCart;

/// Persistence seam for visitor carts.
#[allow(async_fn_in_trait)]
pub trait CartStore {
    type Error;

    /// Load the cart, or an empty one when none has been stored yet.
    async fn load(&self) -> Result<SessionCart, Self::Error>;

    /// Persist the cart.
    async fn save(&self, cart: &SessionCart) -> Result<(), Self::Error>;

    /// Drop the stored cart entirely.
    async fn clear(&self) -> Result<(), Self::Error>;
}

/// Cookie-session cart storage for one visitor.
pub struct SessionCartStore<'a> {
    session: &'a Session,
}

impl<'a> SessionCartStore<'a> {
    /// Bind the store to a request's session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl CartStore for SessionCartStore<'_> {
    type Error = tower_sessions::session::Error;

    async fn load(&self) -> Result<SessionCart, Self::Error> {
        Ok(self
            .session
            .get::<SessionCart>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, cart: &SessionCart) -> Result<(), Self::Error> {
        self.session.insert(session_keys::CART, cart).await
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.session
            .remove::<SessionCart>(session_keys::CART)
            .await
            .map(|_| ())
    }
}

/// Process-local cart storage, keyed by user id.
///
/// Carts in here are shared mutable state across concurrent requests and die
/// with the process. Scope the store to a single user with
/// [`MemoryCartStore::scope`] to get a [`CartStore`] handle.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: RwLock<HashMap<String, SessionCart>>,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope the store to one user's cart.
    #[must_use]
    pub const fn scope<'a>(&'a self, user_id: &'a str) -> MemoryCartHandle<'a> {
        MemoryCartHandle {
            store: self,
            user_id,
        }
    }
}

/// A [`MemoryCartStore`] scoped to one user.
pub struct MemoryCartHandle<'a> {
    store: &'a MemoryCartStore,
    user_id: &'a str,
}

impl CartStore for MemoryCartHandle<'_> {
    type Error = Infallible;

    async fn load(&self) -> Result<SessionCart, Self::Error> {
        Ok(self
            .store
            .carts
            .read()
            .get(self.user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, cart: &SessionCart) -> Result<(), Self::Error> {
        self.store
            .carts
            .write()
            .insert(self.user_id.to_owned(), cart.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.store.carts.write().remove(self.user_id);
        Ok(())
    }
}
