//! Common utility functions for payroll and growth calculations.
//!
//! This module provides shared functionality used across the calculators,
//! including rounding, input checks and compound growth factors.

use rust_decimal::{Decimal, RoundingStrategy};

use super::CalculationError;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows the Brazilian accounting convention where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(121.575)), dec!(121.58));
/// assert_eq!(round_half_up(dec!(248.5998)), dec!(248.60));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_half_up_dp(value, 2)
}

/// Half-up rounding to an arbitrary number of decimal places.
pub fn round_half_up_dp(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects negative monetary inputs.
pub fn ensure_non_negative(
    name: &'static str,
    value: Decimal,
) -> Result<Decimal, CalculationError> {
    if value < Decimal::ZERO {
        return Err(CalculationError::NegativeAmount { name, value });
    }
    Ok(value)
}

/// Rejects growth rates below -100%.
pub fn ensure_growth_rate(
    name: &'static str,
    rate: Decimal,
) -> Result<Decimal, CalculationError> {
    if rate < Decimal::NEGATIVE_ONE {
        return Err(CalculationError::RateBelowMinusOne { name, rate });
    }
    Ok(rate)
}

/// Converts a percentage (e.g. `12.5`) into a fraction (`0.125`).
pub fn percent(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}

/// Computes `base ^ exponent` by repeated squaring.
///
/// # Errors
///
/// Returns [`CalculationError::Overflow`] if an intermediate product leaves
/// the decimal range.
pub fn checked_powi(
    base: Decimal,
    exponent: u32,
) -> Result<Decimal, CalculationError> {
    let overflow = CalculationError::Overflow {
        operation: "exponentiation",
    };

    let mut result = Decimal::ONE;
    let mut factor = base;
    let mut remaining = exponent;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(factor).ok_or(overflow.clone())?;
        }
        remaining >>= 1;
        if remaining > 0 {
            factor = factor.checked_mul(factor).ok_or(overflow.clone())?;
        }
    }

    Ok(result)
}

/// Growth factor `(1 + rate) ^ periods`.
pub fn compound_factor(
    rate: Decimal,
    periods: u32,
) -> Result<Decimal, CalculationError> {
    checked_powi(Decimal::ONE + rate, periods)
}
