//! Checked decimal arithmetic used throughout the engine.
//!
//! Emission totals are accumulated with [`rust_decimal::Decimal`] (96-bit
//! mantissa, 28 significant digits) so sums over large inventories do not
//! drift the way `f64` would. The `Decimal` operators panic on overflow; the
//! helpers here turn that into a [`CalculationError`] instead.

use crate::errors::{CalculationError, CalculationResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Multiplies two decimals, failing instead of panicking on overflow.
pub fn mul(a: Decimal, b: Decimal, what: &'static str) -> CalculationResult<Decimal> {
    a.checked_mul(b).ok_or(CalculationError::DecimalOverflow(what))
}

/// Subtracts `b` from `a`, failing instead of panicking on overflow.
pub fn sub(a: Decimal, b: Decimal, what: &'static str) -> CalculationResult<Decimal> {
    a.checked_sub(b).ok_or(CalculationError::DecimalOverflow(what))
}

/// Divides two decimals.
///
/// # Errors
///
/// `DivisionByZero` if `b` is zero, `DecimalOverflow` if the quotient does
/// not fit.
pub fn div(a: Decimal, b: Decimal, what: &'static str) -> CalculationResult<Decimal> {
    if b.is_zero() {
        return Err(CalculationError::DivisionByZero(what));
    }
    a.checked_div(b).ok_or(CalculationError::DecimalOverflow(what))
}

/// Sums an iterator of decimals with overflow checking.
pub fn sum<I>(values: I, what: &'static str) -> CalculationResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or(CalculationError::DecimalOverflow(what))
    })
}

/// Rounds a value for display.
///
/// Only presentation code should call this; calculated amounts are stored
/// unrounded.
#[must_use]
pub fn round_for_display(value: Decimal, decimal_places: u32) -> Decimal {
    value
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
