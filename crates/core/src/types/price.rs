//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are persisted as plain JSON numbers (`"price": 10.5`) so records
//! written by earlier app versions keep loading. The number is written with
//! every digit of the [`Decimal`], never through `f64`, so a price reads back
//! exactly as it was stored.
//!
//! Arithmetic saturates at the bounds of [`Decimal`] instead of panicking; a
//! stored record with absurd prices still yields a (clamped) total.

use core::fmt;
use core::ops::{Add, Mul};
use core::str::FromStr;
use std::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price {input:?}: {reason}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Why the decimal parser rejected it.
        reason: String,
    },
}

/// A unit price in the store's currency.
///
/// # Examples
///
/// ```
/// use go_marketplace_core::Price;
///
/// let price: Price = "19.9".parse().unwrap();
/// assert_eq!(price.to_string(), "19.90");
/// assert_eq!(price.times(3).to_string(), "59.70");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| PriceError::Invalid {
                input: s.to_owned(),
                reason: e.to_string(),
            })
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_json_number() {
        let price = Price::from_cents(1050);
        assert_eq!(serde_json::to_string(&price).unwrap(), "10.50");
        assert_eq!(serde_json::to_string(&Price::from_cents(499)).unwrap(), "4.99");
    }

    #[test]
    fn test_price_keeps_every_digit_through_json() {
        let price: Price = "19.123456789012345678".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "19.123456789012345678");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
        assert_eq!(back.amount().to_string(), "19.123456789012345678");
    }

    #[test]
    fn test_price_deserializes_integers_and_floats() {
        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole, Price::from_cents(1000));

        let fractional: Price = serde_json::from_str("4.99").unwrap();
        assert_eq!(fractional, Price::from_cents(499));
    }

    #[test]
    fn test_price_rejects_non_numeric_values() {
        assert!(serde_json::from_str::<Price>("\"abc\"").is_err());
    }

    #[test]
    fn test_price_display_has_two_decimals() {
        assert_eq!(Price::from_cents(1000).to_string(), "10.00");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_price_parse() {
        assert_eq!(" 12.34 ".parse::<Price>().unwrap(), Price::from_cents(1234));
        assert!(matches!(
            "twelve".parse::<Price>(),
            Err(PriceError::Invalid { .. })
        ));
    }

    #[test]
    fn test_price_sum_is_exact() {
        let total: Price = std::iter::repeat_n(Price::from_cents(10), 3).sum();
        assert_eq!(total, Price::from_cents(30));
        assert_eq!(Price::from_cents(250) * 4, Price::from_cents(1000));
    }

    #[test]
    fn test_price_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max + Price::from_cents(1), max);

        let near_max: Price = "50000000000000000000000000000".parse().unwrap();
        let total: Price = [near_max, near_max, Price::from_cents(100)].into_iter().sum();
        assert_eq!(total, max);
        assert_eq!(near_max.times(2).to_string(), "79228162514264337593543950335.00");
    }
}
