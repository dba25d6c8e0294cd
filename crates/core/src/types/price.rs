//! Nightly campground price.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more than two decimal places.
    #[error("price can have at most two decimal places")]
    TooPrecise,
    /// The amount does not fit the stored column.
    #[error("price cannot exceed 99999999.99")]
    TooLarge,
}

/// A nightly price in dollars.
///
/// Always non-negative with at most two decimal places, matching the
/// `NUMERIC(10, 2)` column it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Largest amount a `NUMERIC(10, 2)` column holds.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

    /// Create a price from an amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`], [`PriceError::TooPrecise`] or
    /// [`PriceError::TooLarge`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// Create a price from whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: u32) -> Self {
        Self(Decimal::from(dollars))
    }

    /// Parse user input such as `"12"` or `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] when the input is not a valid price.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    /// Formats without trailing zeros for whole amounts: `$25`, `$12.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract().is_zero() {
            write!(f, "${}", self.0.trunc())
        } else {
            write!(f, "${:.2}", self.0)
        }
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
        Ok(Self(amount))
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
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(Price::parse("25").unwrap(), Price::from_dollars(25));
        assert_eq!(Price::parse(" 12.50 ").unwrap().to_string(), "$12.50");
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!(Price::parse("0").unwrap().to_string(), "$0");
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_too_precise_rejected() {
        assert_eq!(Price::parse("9.999"), Err(PriceError::TooPrecise));
        // Trailing zeros do not count
        assert!(Price::parse("9.9900").is_ok());
    }

    #[test]
    fn test_column_limit() {
        assert_eq!(Price::MAX_AMOUNT.to_string(), "99999999.99");
        assert_eq!(
            Price::parse("99999999.99").unwrap().amount(),
            Price::MAX_AMOUNT
        );
        assert_eq!(Price::parse("100000000"), Err(PriceError::TooLarge));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(Price::parse("free"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse(""), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_display_whole_dollars() {
        assert_eq!(Price::from_dollars(17).to_string(), "$17");
    }
}
