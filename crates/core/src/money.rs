//! Money helpers backed by `rust_decimal`.
//!
//! Amounts travel as `f64` (JSON numbers, SQLite REAL). Every calculation
//! converts to [`Decimal`], does the arithmetic there, and rounds back to
//! two decimal places half-away-from-zero.

use rust_decimal::prelude::*;

/// Number of decimal places kept for monetary values.
pub const DECIMAL_PLACES: u32 = 2;

/// Convert an already validated f64 to Decimal for calculation.
///
/// Callers bound their inputs first (see
/// [`require_bounded`](crate::validation::require_bounded)); use
/// [`try_decimal`] for values that have not been checked.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert an unchecked f64, failing instead of collapsing to zero when it
/// is not finite or outside the `Decimal` range.
pub fn try_decimal(field: &str, value: f64) -> Result<Decimal, String> {
    if !value.is_finite() {
        return Err(format!("{field} must be a finite number, got {value}"));
    }
    Decimal::from_f64(value).ok_or_else(|| format!("{field} is out of range, got {value}"))
}

/// Round a Decimal to cents.
#[inline]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to cents.
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_cents(value).to_f64().unwrap_or_default()
}

/// Round an f64 amount to cents.
#[inline]
pub fn round2(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// `value * percent / 100` as a Decimal.
#[inline]
pub fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    value * percent / Decimal::ONE_HUNDRED
}
