//! # Money Module
//!
//! Exact amounts for prices, line totals and receipt totals.
//!
//! ## Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "19.99" ──parse_decimal──► Money(1999) ──Display──► "19.99"            │
//! │                                                                         │
//! │  1999 × 2 + 550 × 3 = 5648 cents = 56.48                                │
//! │                                                                         │
//! │  Every amount is an i64 count of cents. Decimal strings are read digit  │
//! │  by digit, so no amount ever passes through an f64.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! // Create from cents or from a decimal string
//! let price = Money::from_cents(1999);
//! let same: Money = "19.99".parse().unwrap();
//! assert_eq!(price, same);
//!
//! let doubled = price * 2;                       // 39.98
//! let total = doubled + Money::from_cents(550);  // 45.48
//! assert_eq!(total.to_string(), "45.48");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use crate::error::CoreError;

/// Number of fractional digits carried by every amount.
pub const DECIMAL_PLACES: usize = 2;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in cents.
///
/// Signed, so a parsed `"-1.00"` can be reported as negative rather than
/// malformed.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item.price_cents ──► ReceiptLine.unit_price ──► ReceiptLine.line_total │
/// │                                                        │                │
/// │                                                        ▼                │
/// │                                        ReceiptContext.total_price       │
/// │                                                        │                │
/// │                                                        ▼                │
/// │                                        "56.48" in the rendered receipt  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Wraps a count of cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Amount in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Cents past the whole units, 0-99.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Line total for `qty` units at this price.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1999); // 19.99
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 3998);     // 39.98
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Parses a decimal string such as `"19.99"`, `"5.5"` or `"7"`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - Digits with at most one `.`
    /// - At most [`DECIMAL_PLACES`] fractional digits
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("5.5").unwrap().cents(), 550);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("a number is required"));
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("a valid number is required"));
        }
        if frac_part.len() > DECIMAL_PLACES {
            return Err(invalid("at most 2 decimal places are allowed"));
        }

        let major: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| invalid("value is too large"))?
        };

        // "5" -> 0, "5.5" -> 50, "5.55" -> 55
        let mut minor: i64 = 0;
        for (position, digit) in frac_part.bytes().enumerate() {
            let scale = 10_i64.pow((DECIMAL_PLACES - 1 - position) as u32);
            minor += i64::from(digit - b'0') * scale;
        }

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("value is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Counts the digits of the amount as written with two decimals.
    ///
    /// `123.45` has 5 digits, `0.50` has 3.
    pub fn digit_count(&self) -> usize {
        self.major().unsigned_abs().to_string().len() + DECIMAL_PLACES
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the plain decimal form used on receipts and in the API.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", self.major().unsigned_abs(), self.minor())
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Serializes Money as a decimal string (`"19.99"`).
///
/// ## Usage
/// ```rust,ignore
/// #[serde(with = "till_core::money::decimal")]
/// pub price: Money,
/// ```
pub mod decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(money)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        let price = Money::from_cents(1099);
        assert_eq!((price.major(), price.minor()), (10, 99));

        let refund = Money::from_cents(-1099);
        assert_eq!((refund.major(), refund.minor()), (-10, 99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("19.99").unwrap().cents(), 1999);
        assert_eq!(Money::parse_decimal("5.5").unwrap().cents(), 550);
        assert_eq!(Money::parse_decimal("5.50").unwrap().cents(), 550);
        assert_eq!(Money::parse_decimal("7").unwrap().cents(), 700);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("3.").unwrap().cents(), 300);
        assert_eq!(Money::parse_decimal(" 0.05 ").unwrap().cents(), 5);
        assert_eq!(Money::parse_decimal("-2.25").unwrap().cents(), -225);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal("1e5").is_err());
        assert!(Money::parse_decimal("1.999").is_err());
        assert!(Money::parse_decimal("5.500").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(Money::from_cents(12345).digit_count(), 5);
        assert_eq!(Money::from_cents(50).digit_count(), 3);
        assert_eq!(Money::from_cents(-12345).digit_count(), 5);
    }

    #[test]
    fn test_arithmetic() {
        let tea = Money::from_cents(1999);
        let cups = Money::from_cents(550);

        assert_eq!((tea + cups).to_string(), "25.49");
        assert_eq!(tea * 3, tea.multiply_quantity(3));

        let mut running = Money::zero();
        running += cups;
        running += cups;
        assert_eq!(running.cents(), 1100);
    }

    #[test]
    fn test_sum_is_exact() {
        let lines = [
            Money::from_cents(1999).multiply_quantity(2),
            Money::from_cents(550).multiply_quantity(3),
        ];
        let total: Money = lines.into_iter().sum();

        assert_eq!(total.cents(), 5648);
        assert_eq!(total.to_string(), "56.48");
    }

    #[test]
    fn test_decimal_serde_helper() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "decimal")]
            price: Money,
        }

        let json = serde_json::to_string(&Wrapper {
            price: Money::from_cents(1999),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":"19.99"}"#);

        let back: Wrapper = serde_json::from_str(r#"{"price":"5.5"}"#).unwrap();
        assert_eq!(back.price.cents(), 550);
    }
}
