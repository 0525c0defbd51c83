//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(12, 2)` and travel over JSON as plain
//! numbers (`9.99`), matching what API clients already send.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more fractional digits than the store keeps.
    #[error("price must have at most {max_scale} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places.
        max_scale: u32,
    },
    /// The amount does not fit the storage column.
    #[error("price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: Decimal,
    },
}

/// A non-negative product price in the shop currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Decimal places kept by the store.
    pub const MAX_SCALE: u32 = 2;

    /// Exclusive upper bound imposed by `NUMERIC(12, 2)`.
    #[must_use]
    pub fn max() -> Decimal {
        Decimal::from(10_000_000_000_i64)
    }

    /// Create a price, validating sign, precision and magnitude.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is negative, has more than two
    /// decimal places, or is 10 000 000 000 or more.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let amount = amount.normalize();
        if amount.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise {
                max_scale: Self::MAX_SCALE,
            });
        }

        if amount >= Self::max() {
            return Err(PriceError::TooLarge { max: Self::max() });
        }

        Ok(Self(amount))
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
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
    fn test_new_accepts_zero_and_positive() {
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(dec("9.99")).is_ok());
        assert!(Price::new(dec("1000")).is_ok());
    }

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(Price::new(dec("-0.01")), Err(PriceError::Negative));
        assert_eq!(Price::new(dec("-5")), Err(PriceError::Negative));
    }

    #[test]
    fn test_new_rejects_extra_precision() {
        assert_eq!(
            Price::new(dec("1.999")),
            Err(PriceError::TooPrecise { max_scale: 2 })
        );
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let price = Price::new(dec("2.5000")).unwrap();
        assert_eq!(price.amount(), dec("2.5"));
    }

    #[test]
    fn test_new_rejects_too_large() {
        assert_eq!(Price::max(), dec("10000000000"));
        assert!(Price::new(dec("9999999999.99")).is_ok());
        assert!(matches!(
            Price::new(dec("10000000000")),
            Err(PriceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_display_has_two_decimals() {
        assert_eq!(Price::new(dec("3")).unwrap().to_string(), "3.00");
        assert_eq!(Price::new(dec("9.99")).unwrap().to_string(), "9.99");
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::new(dec("9.99")).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "9.99");
    }

    #[test]
    fn test_deserialize_from_number() {
        let price: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(price.amount(), dec("9.99"));

        let price: Price = serde_json::from_str("12").unwrap();
        assert_eq!(price.amount(), dec("12"));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-1.5").is_err());
    }
}
