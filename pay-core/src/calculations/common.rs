//! Common utility functions for payroll calculations.
//!
//! This module provides the rounding and percentage helpers shared by the
//! withholding, contribution and proration calculators.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pay_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(153.845)), dec!(153.85));
/// assert_eq!(round_half_up(dec!(3076.923)), dec!(3076.92));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pay_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-12.50), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// `amount × percent / 100`, rounded to cents.
///
/// Percent-of-pay elections (401(k), ESPP, bonus targets) are stored as
/// whole-number percentages.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pay_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(3076.92), dec!(5)), dec!(153.85));
/// ```
pub fn percent_of(
    amount: Decimal,
    percent: Decimal,
) -> Decimal {
    round_half_up(amount * percent / Decimal::ONE_HUNDRED)
}

/// Clamps negative values to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
