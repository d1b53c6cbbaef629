//! Fixed-point product price.
//!
//! Prices are stored as `NUMERIC(10, 2)`: at most ten digits, two of them
//! after the decimal point, never negative.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more than two decimal places.
    #[error("price must have at most {max} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places.
        max: u32,
    },
    /// The integer part does not fit in the column.
    #[error("price must have at most {max} digits before the decimal point")]
    TooLarge {
        /// Maximum number of integer digits.
        max: u32,
    },
}

/// A non-negative amount with exactly two decimal places.
///
/// Serializes as a string (`"19.90"`) so clients never see binary float
/// rounding; deserializes from either a JSON string or a JSON number.
///
/// ```
/// use rust_decimal::Decimal;
/// use vitrine_core::Price;
///
/// let price = Price::new(Decimal::new(199, 1)).unwrap();
/// assert_eq!(price.to_string(), "19.90");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// assert!(Price::new(Decimal::new(1999, 3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Total number of digits the column stores.
    pub const MAX_DIGITS: u32 = 10;
    /// Digits after the decimal point.
    pub const DECIMAL_PLACES: u32 = 2;

    /// Validate an amount and normalize it to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the amount is negative, has more than two
    /// significant decimal places, or has more than eight integer digits.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > Self::DECIMAL_PLACES {
            return Err(PriceError::TooPrecise {
                max: Self::DECIMAL_PLACES,
            });
        }
        let integer_digits = Self::MAX_DIGITS - Self::DECIMAL_PLACES;
        if amount.trunc() >= Decimal::from(10_i64.pow(integer_digits)) {
            return Err(PriceError::TooLarge {
                max: integer_digits,
            });
        }

        let mut amount = amount.abs();
        amount.rescale(Self::DECIMAL_PLACES);
        Ok(Self(amount))
    }

    /// A zero price.
    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::new(0, Self::DECIMAL_PLACES))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rescales_to_two_places() {
        assert_eq!(Price::new(dec("19.9")).unwrap().to_string(), "19.90");
        assert_eq!(Price::new(dec("5")).unwrap().to_string(), "5.00");
        assert_eq!(Price::new(dec("0.10")).unwrap().to_string(), "0.10");
        assert_eq!(Price::zero().to_string(), "0.00");
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        assert_eq!(Price::new(dec("12.5000")).unwrap().to_string(), "12.50");
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        assert_eq!(Price::new(dec("-0.01")), Err(PriceError::Negative));
        assert_eq!(
            Price::new(dec("1.999")),
            Err(PriceError::TooPrecise { max: 2 })
        );
        assert_eq!(
            Price::new(dec("100000000")),
            Err(PriceError::TooLarge { max: 8 })
        );
        assert!(Price::new(dec("99999999.99")).is_ok());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Price::new(dec("-0.00")).unwrap(), Price::zero());
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("19.99").unwrap();
        let from_string: Price = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"19.99\"");

        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
