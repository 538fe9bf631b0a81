//! # Money Module
//!
//! Provides the `Money` type for handling fares, menu prices and revenue.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing float prices drifts:                                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    Backend decimals are converted to paise ONCE, at the record          │
//! │    boundary. Cart totals and revenue are exact integer sums.            │
//! │    Two-decimal rounding only ever happens on the way in (decimal →      │
//! │    paise) and never between additions.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use swiftlane_core::money::Money;
//!
//! let price = Money::from_major_minor(320, 0); // ₹320.00
//! let total = price * 2 + Money::from_paise(2550);
//! assert_eq!(total.to_string(), "₹665.50");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::decode::type_name;
use crate::error::DataShapeError;

/// Paise per rupee.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences and adjustments can go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Saturating arithmetic**: sums and products clamp at the i64 bounds
/// - **Serde**: serializes as the raw paise count; payloads that the backend
///   reads as decimal rupees use [`serde_major`]
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► CartLine.unit_price ──► CartLine.line_total ──► Cart.total
///                                                                     │
///                                                  NewOrder.total_amount
///
/// FareEstimator ──► FareQuote.fare ──► NewRide.fare
///
/// Ride.fare + Order.total_amount ──► AggregateSnapshot.total_revenue
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use swiftlane_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(12, 50).paise(), 1250);
    /// assert_eq!(Money::from_major_minor(-5, 50).paise(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Converts a decimal rupee amount, rounding to the nearest paisa.
    ///
    /// Returns `None` for NaN, infinities, and values outside the i64 range.
    ///
    /// ## Example
    /// ```rust
    /// use swiftlane_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(110.456), Some(Money::from_paise(11046)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let paise = (value * MINOR_PER_MAJOR as f64).round();
        if paise < i64::MIN as f64 || paise > i64::MAX as f64 {
            return None;
        }
        Some(Money(paise as i64))
    }

    /// Parses a backend amount: a JSON number or a numeric string.
    ///
    /// ## Example
    /// ```rust
    /// use serde_json::json;
    /// use swiftlane_core::money::Money;
    ///
    /// assert_eq!(Money::from_json(&json!("100")), Ok(Money::from_major_minor(100, 0)));
    /// assert_eq!(Money::from_json(&json!(12.5)), Ok(Money::from_paise(1250)));
    /// assert!(Money::from_json(&json!(null)).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, DataShapeError> {
        match value {
            Value::Null => Err(DataShapeError::Absent),
            Value::Number(n) => n
                .as_f64()
                .and_then(Money::from_decimal)
                .ok_or_else(|| DataShapeError::Unparseable {
                    expected: "amount",
                    value: n.to_string(),
                }),
            Value::String(s) => Money::parse(s),
            other => Err(DataShapeError::WrongType {
                expected: "amount",
                found: type_name(other),
            }),
        }
    }

    /// Parses a decimal rupee amount from text (`"140"`, `" 12.50 "`).
    pub fn parse(text: &str) -> Result<Self, DataShapeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DataShapeError::Absent);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Money::from_decimal)
            .ok_or_else(|| DataShapeError::Unparseable {
                expected: "amount",
                value: trimmed.to_string(),
            })
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns the amount as decimal rupees (for payloads and charts).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Serializes `Money` as decimal rupees, the form the backend stores.
///
/// ```rust,ignore
/// #[serde(with = "crate::money::serde_major")]
/// pub fare: Money,
/// ```
pub mod serde_major {
    use super::*;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Money::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Lenient decoding for optional backend amounts.
///
/// Absent, null and malformed values all decode to `None`; a malformed
/// amount never fails the surrounding record.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| Money::from_json(&v).ok()))
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rupee display.
///
/// ## Note
/// No locale handling beyond the two decimal places.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
