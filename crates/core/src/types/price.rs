//! Type-safe price representation using decimal arithmetic.
//!
//! Cart totals are money, so they go through [`rust_decimal::Decimal`] and
//! never through floats. A [`Price`] is always strictly positive and carries
//! exactly two fraction digits.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be positive, got {0}")]
    NotPositive(Decimal),
    /// The amount carries more than two fraction digits.
    #[error("price must have at most {max} fraction digits, got {scale}")]
    TooPrecise {
        /// Fraction digits on the rejected amount.
        scale: u32,
        /// Maximum allowed fraction digits.
        max: u32,
    },
}

/// A unit price.
///
/// ## Constraints
///
/// - Strictly positive
/// - At most two fraction digits on input; stored rescaled to exactly two
///
/// ## Examples
///
/// ```
/// use quitanda_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(1999, 2)).unwrap();
/// assert_eq!(price.to_string(), "19.99");
/// assert_eq!(price.line_total(2), Decimal::new(3998, 2));
///
/// assert!(Price::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Fraction digits carried by every price.
    pub const FRACTION_DIGITS: u32 = 2;

    /// Create a new price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts and
    /// [`PriceError::TooPrecise`] for amounts with sub-cent precision.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }

        if amount.scale() > Self::FRACTION_DIGITS {
            return Err(PriceError::TooPrecise {
                scale: amount.scale(),
                max: Self::FRACTION_DIGITS,
            });
        }

        let mut amount = amount;
        amount.rescale(Self::FRACTION_DIGITS);
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units, exact.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
