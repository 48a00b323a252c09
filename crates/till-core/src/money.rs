//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sale of 3 × 19.99 at 12.5% off in floats drifts by fractions of a   │
//! │  cent, and the stored total stops matching the sum of its rows.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 of cents. Rounding happens exactly once,     │
//! │    per line, with integer math.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundaries
//! Decimal text ("12.50") is parsed with [`str::parse`] and never passes
//! through `f64`. Only the REST wire format speaks decimal numbers, and it
//! converts with [`Money::from_major_f64`] / [`Money::to_major_f64`].
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! let price: Money = "10.99".parse().unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let doubled = price * 2;
//! assert_eq!(doubled.to_string(), "$21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Product.retail_price ──► SaleLineItem.unit_price (snapshot)
///                                   │
///                                   ▼
///                     line_amount(price, qty, discount)
///                                   │
///                                   ▼
///                            Sale.total (Σ lines)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount in major units, rounding to the nearest cent.
    ///
    /// Non-finite input becomes zero.
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in major units as a float, for wire formats only.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors the value at zero.
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Adds two amounts, or `None` if the sum does not fit.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Formats with a custom symbol and number of decimals.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(123456).format_with("Rs ", 2), "Rs 1234.56");
    /// assert_eq!(Money::from_cents(123456).format_with("¥", 0), "¥1235");
    /// ```
    pub fn format_with(&self, symbol: &str, decimals: u8) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        match decimals {
            0 => format!("{}{}{}", sign, symbol, (abs + 50) / 100),
            1 => format!("{}{}{}.{}", sign, symbol, (abs + 5) / 100, ((abs + 5) / 10) % 10),
            _ => format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text such as `"12"`, `"12.5"`, `"12.50"` or `"$12.50"`.
///
/// More than two fractional digits are rejected rather than rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest).replace(',', "");
        if rest.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (whole, frac) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest.as_str(), ""),
        };
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("not a number"));
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("not a number"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("not a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("not a number"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(|| invalid("amount too large"))?;
        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$", 2))
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("12".parse::<Money>().unwrap().cents(), 1200);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("12.05".parse::<Money>().unwrap().cents(), 1205);
        assert_eq!(" $1,250.00 ".parse::<Money>().unwrap().cents(), 125_000);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("-3.10".parse::<Money>().unwrap().cents(), -310);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_major_f64_conversion() {
        assert_eq!(Money::from_major_f64(19.99).cents(), 1999);
        assert_eq!(Money::from_major_f64(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_major_f64(f64::NAN).cents(), 0);
        assert_eq!(Money::from_cents(1999).to_major_f64(), 19.99);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates_at_bounds() {
        let max = Money::from_cents(i64::MAX);
        let price = Money::from_cents(10_000);

        assert_eq!(price * 1_000_000_000_000_000, max);
        assert_eq!(price * i64::MAX, max);
        assert_eq!(max + price, max);
        assert_eq!(Money::from_cents(i64::MIN) - price, Money::from_cents(i64::MIN));

        let mut running = max;
        running += price;
        assert_eq!(running, max);

        let total: Money = vec![max, max].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(10_000);
        assert_eq!(price.checked_add(price), Some(Money::from_cents(20_000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(price), None);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_cents(7).clamp_non_negative().cents(), 7);
    }

    #[test]
    fn test_format_with_symbol_and_decimals() {
        let m = Money::from_cents(123_456);
        assert_eq!(m.format_with("$", 2), "$1234.56");
        assert_eq!(m.format_with("€", 1), "€1234.6");
        assert_eq!(m.format_with("", 0), "1235");
        assert_eq!(Money::from_cents(-5).format_with("$", 2), "-$0.05");
    }
}
