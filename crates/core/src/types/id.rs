//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use quitanda_core::define_id;
/// define_id!(CustomerId);
/// define_id!(OrderId);
///
/// let customer_id = CustomerId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(OrderItemId);

/// A parsed cart key.
///
/// Session carts key their entries by the product ID rendered as a string.
/// `ProductId::parse_key` is the one sanctioned way back from that string
/// form; anything that fails here is an invalid cart entry.
impl ProductId {
    /// Parse a cart key (stringified product ID) back into a `ProductId`.
    ///
    /// Returns `None` for anything that is not a well-formed i32, including
    /// empty strings and keys with stray whitespace.
    #[must_use]
    pub fn parse_key(key: &str) -> Option<Self> {
        key.parse::<i32>().ok().map(Self::new)
    }

    /// Render this ID in cart-key form.
    #[must_use]
    pub fn as_key(&self) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = ProductId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(ProductId::from(42), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderId::new(7).to_string(), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id = CustomerId::new(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "3");

        let parsed: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(ProductId::parse_key("15"), Some(ProductId::new(15)));
        assert_eq!(ProductId::parse_key("-2"), Some(ProductId::new(-2)));
        assert_eq!(ProductId::parse_key(""), None);
        assert_eq!(ProductId::parse_key("abc"), None);
        assert_eq!(ProductId::parse_key("1.5"), None);
        assert_eq!(ProductId::parse_key(" 1"), None);
    }

    #[test]
    fn test_as_key() {
        assert_eq!(ProductId::new(15).as_key(), "15");
    }
}
