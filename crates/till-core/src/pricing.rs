//! # Pricing Calculator
//!
//! Pure functions that turn sale lines into amounts and totals, and that
//! decide whether a sale may be saved.
//!
//! ## Line Amount
//! ```text
//! amount = round2( max(0, unit_price × quantity × (1 − discount / 100)) )
//! total  = max(0, Σ amount)
//! ```
//!
//! ## Input Coercion
//! Quantity and discount arrive as free-form numbers from the user. They are
//! forced into range before they reach a line, and the caller is told what
//! was adjusted so it can show a warning:
//!
//! | Input            | Result | Adjustment                       |
//! |------------------|--------|----------------------------------|
//! | quantity `-3`    | `1`    | "Quantity must be at least 1"    |
//! | quantity `2.6`   | `3`    | none                             |
//! | discount `-5`    | `0`    | "Discount cannot be negative"    |
//! | discount `150`   | `100`  | "Discount cannot exceed 100%"    |
//! | discount `12.346`| `12.35`| none                             |

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, LineItemError, LineItemProblem};
use crate::money::Money;
use crate::types::SaleLineItem;

/// Full discount, in basis points.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage discount held exactly as basis points.
///
/// Two decimals of a percent fit exactly: 12.34% is 1234 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Converts a percentage, rounding to two decimals. Negative input is zero.
    pub fn from_percent(percent: f64) -> Self {
        if !percent.is_finite() || percent <= 0.0 {
            return DiscountRate(0);
        }
        DiscountRate((percent * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// A value forced into range, plus the warning to show if it had to move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub adjustment: Option<&'static str>,
}

impl<T> Coerced<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            adjustment: None,
        }
    }

    fn adjusted(value: T, reason: &'static str) -> Self {
        Self {
            value,
            adjustment: Some(reason),
        }
    }
}

/// Rounds a quantity to the nearest integer, with a floor of 1.
///
/// ## Example
/// ```rust
/// use till_core::pricing::coerce_quantity;
///
/// assert_eq!(coerce_quantity(-3.0).value, 1);
/// assert!(coerce_quantity(-3.0).adjustment.is_some());
/// assert_eq!(coerce_quantity(2.6).value, 3);
/// ```
pub fn coerce_quantity(input: f64) -> Coerced<i64> {
    if !input.is_finite() {
        return Coerced::adjusted(1, "Quantity must be at least 1");
    }
    let rounded = input.round();
    if rounded < 1.0 {
        return Coerced::adjusted(1, "Quantity must be at least 1");
    }
    Coerced::clean(rounded.min(i64::MAX as f64) as i64)
}

/// Clamps a discount percentage into 0..=100 and rounds it to two decimals.
pub fn coerce_discount(input: f64) -> Coerced<DiscountRate> {
    if !input.is_finite() {
        return Coerced::adjusted(DiscountRate(0), "Discount cannot be negative");
    }
    if input < 0.0 {
        return Coerced::adjusted(DiscountRate(0), "Discount cannot be negative");
    }
    if input > 100.0 {
        return Coerced::adjusted(
            DiscountRate(MAX_DISCOUNT_BPS),
            "Discount cannot exceed 100%",
        );
    }
    Coerced::clean(DiscountRate::from_percent(input).min(DiscountRate(MAX_DISCOUNT_BPS)))
}

// =============================================================================
// Amounts
// =============================================================================

/// Discounted amount of one line, rounded to cents and floored at zero.
///
/// An amount too large for `i64` cents saturates; [`validate_line_items`]
/// rejects such lines before a sale is saved.
///
/// ## Example
/// ```rust
/// use till_core::money::Money;
/// use till_core::pricing::{line_amount, DiscountRate};
///
/// let amount = line_amount(Money::from_cents(10_000), 2, DiscountRate::from_bps(1000));
/// assert_eq!(amount.cents(), 18_000);
/// ```
pub fn line_amount(unit_price: Money, quantity: i64, discount: DiscountRate) -> Money {
    let cents = scaled_line_amount(unit_price, quantity, discount).max(0);
    Money::from_cents(i64::try_from(cents).unwrap_or(i64::MAX))
}

/// Like [`line_amount`], but `None` when the amount does not fit in `i64` cents.
pub fn checked_line_amount(unit_price: Money, quantity: i64, discount: DiscountRate) -> Option<Money> {
    let cents = scaled_line_amount(unit_price, quantity, discount).max(0);
    i64::try_from(cents).ok().map(Money::from_cents)
}

/// `price × quantity × (1 − bps / 10000)` in i128, rounded half away from zero.
fn scaled_line_amount(unit_price: Money, quantity: i64, discount: DiscountRate) -> i128 {
    let remaining = (MAX_DISCOUNT_BPS - discount.bps().min(MAX_DISCOUNT_BPS)) as i128;
    // |price × qty| < 2^126, so only the discount step can saturate.
    let scaled = (unit_price.cents() as i128 * quantity as i128).saturating_mul(remaining);
    if scaled >= 0 {
        scaled.saturating_add(5_000) / 10_000
    } else {
        scaled.saturating_sub(5_000) / 10_000
    }
}

/// Sum of all line amounts, floored at zero. Saturates instead of overflowing.
pub fn sale_total(items: &[SaleLineItem]) -> Money {
    items
        .iter()
        .map(SaleLineItem::amount)
        .sum::<Money>()
        .clamp_non_negative()
}

/// Sum of all line amounts, or `None` if a line or the total does not fit.
pub fn checked_sale_total(items: &[SaleLineItem]) -> Option<Money> {
    items.iter().try_fold(Money::zero(), |total, item| {
        let amount = checked_line_amount(item.unit_price(), item.quantity, item.discount())?;
        total.checked_add(amount)
    })
}

// =============================================================================
// Validation
// =============================================================================

/// Checks every line and reports all problems at once.
///
/// Rows are numbered from 1. A row can report several problems.
pub fn validate_line_items(items: &[SaleLineItem]) -> Vec<LineItemError> {
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let row = index + 1;
        let mut push = |problem| errors.push(LineItemError { row, problem });

        if item.quantity < 1 {
            push(LineItemProblem::Quantity);
        }
        if item.discount_bps > MAX_DISCOUNT_BPS {
            push(LineItemProblem::Discount);
        }
        if item.unit_price_cents <= 0 {
            push(LineItemProblem::Price);
        }
        match checked_line_amount(item.unit_price(), item.quantity, item.discount()) {
            None => push(LineItemProblem::TooLarge),
            Some(amount) if !amount.is_positive() => push(LineItemProblem::Amount),
            Some(_) => {}
        }
    }
    errors
}

/// Decides whether a sale may be saved and returns its total.
///
/// ## Order of Checks
/// ```text
/// salesperson chosen? ── no ──► "Please select a salesperson"
///        │ yes
/// any lines? ─────────── no ──► "Please add at least one product"
///        │ yes
/// every line valid? ──── no ──► "Row N: ..." (all rows)
///        │ yes
/// total fits? ────────── no ──► "Total sale amount is too large"
///        │ yes
/// total > 0? ─────────── no ──► "Total sale amount must be greater than zero"
///        │ yes
///        ▼
///      Ok(total)
/// ```
pub fn validate_sale(salesperson_id: &str, items: &[SaleLineItem]) -> CoreResult<Money> {
    if salesperson_id.trim().is_empty() {
        return Err(CoreError::MissingSalesperson);
    }
    if items.is_empty() {
        return Err(CoreError::EmptySale);
    }
    let errors = validate_line_items(items);
    if !errors.is_empty() {
        return Err(CoreError::InvalidLineItems(errors));
    }
    let total = checked_sale_total(items).ok_or(CoreError::TotalTooLarge)?;
    if !total.is_positive() {
        return Err(CoreError::NonPositiveTotal);
    }
    Ok(total)
}

// =============================================================================
// Unit Tests
// =============================================================================
