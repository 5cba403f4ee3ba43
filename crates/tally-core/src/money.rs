//! # Money Module
//!
//! Provides the `Amount` type for handling monetary values exactly.
//!
//! ## Why Decimal Amounts?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart built in the browser sends "3.50". If that value passes        │
//! │  through an f64 on its way to the database, what comes back is not    │
//! │  guaranteed to be "3.50".                                               │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 decimals end to end                              │
//! │    wire "3.50" → Decimal(350, scale 2) → TEXT "3.50" → wire "3.50"     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Amounts serialize as JSON strings. On input, strings and integers are
//! accepted; JSON floats are rejected because they have already been through
//! binary floating point by the time we see them.
//!
//! ```rust
//! use tally_core::money::Amount;
//!
//! let amount: Amount = serde_json::from_str("\"12.30\"").unwrap();
//! assert_eq!(serde_json::to_string(&amount).unwrap(), "\"12.30\"");
//!
//! assert!(serde_json::from_str::<Amount>("12.3").is_err());
//! ```

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Amount Type
// =============================================================================

/// An exact decimal quantity of money.
///
/// ## Design Decisions
/// - **rust_decimal::Decimal**: 96-bit mantissa with explicit scale, so
///   "3.5" and "3.50" are equal numbers but keep their own textual form
/// - **No float constructors**: there is no `from_f64`
/// - **String on the wire**: see module docs
///
/// ## Where Amounts Flow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CheckoutRequest.subtotal/tax/totalAmount ──► Sale header (verbatim)    │
/// │                                                                         │
/// │  SaleItemRequest.price ──► SoldItem.price (unit price snapshot)         │
/// │                                                                         │
/// │  Product.price ──► catalog listing                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Returns the inner decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Number of digits after the decimal point, as written.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

// =============================================================================
// Parsing & Formatting
// =============================================================================

impl FromStr for Amount {
    type Err = ValidationError;

    /// Parses a plain decimal string ("12", "12.30", "-0.5").
    ///
    /// Scientific notation and surrounding whitespace are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.trim() != s {
            return Err(invalid_amount(s));
        }

        Decimal::from_str_exact(s)
            .map(Amount)
            .map_err(|_| invalid_amount(s))
    }
}

fn invalid_amount(raw: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason: format!("'{}' is not a decimal number", raw),
    }
}

/// Display writes the exact stored digits, without currency symbols.
///
/// ## Note
/// Currency formatting is the frontend's job.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string such as \"12.30\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Err(E::custom(format!(
            "amount {} was sent as a binary float; send it as a decimal string",
            v
        )))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_preserves_scale() {
        let amount: Amount = "3.50".parse().unwrap();
        assert_eq!(amount.value(), dec!(3.50));
        assert_eq!(amount.scale(), 2);
        assert_eq!(amount.to_string(), "3.50");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!(" 1.00".parse::<Amount>().is_err());
        assert!("1,00".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("1e3".parse::<Amount>().is_err());
    }

    #[test]
    fn test_equal_numbers_different_scale() {
        let a: Amount = "3.5".parse().unwrap();
        let b: Amount = "3.50".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_serialize_as_string() {
        let amount: Amount = "1234.56".parse().unwrap();
        assert_eq!(serde_json::to_value(amount).unwrap(), serde_json::json!("1234.56"));
    }

    #[test]
    fn test_deserialize_accepts_strings_and_integers() {
        let a: Amount = serde_json::from_str("\"0.10\"").unwrap();
        assert_eq!(a.to_string(), "0.10");

        let b: Amount = serde_json::from_str("7").unwrap();
        assert_eq!(b.value(), dec!(7));
    }

    #[test]
    fn test_deserialize_rejects_floats() {
        assert!(serde_json::from_str::<Amount>("0.1").is_err());
    }

    #[test]
    fn test_decimal_conversions_keep_scale() {
        let amount = Amount::from(dec!(0.30));
        assert_eq!(amount.to_string(), "0.30");
        assert_eq!(Decimal::from(amount).scale(), 2);
    }

    #[test]
    fn test_sign() {
        assert!("-0.01".parse::<Amount>().unwrap().is_negative());
        assert!(!"-0.00".parse::<Amount>().unwrap().is_negative());
        assert!(!"0".parse::<Amount>().unwrap().is_negative());
        assert!(!"12.30".parse::<Amount>().unwrap().is_negative());
    }
}
