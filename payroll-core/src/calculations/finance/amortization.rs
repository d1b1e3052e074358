//! Loan amortization schedules.
//!
//! Two systems are supported:
//!
//! | System | Amortization | Installment |
//! |--------|--------------|-------------|
//! | SAC    | constant (`principal / months`) | decreasing |
//! | PRICE  | increasing | constant |
//!
//! Both take an annual effective rate and convert it to the equivalent
//! monthly rate `(1 + annual)^(1/12) - 1`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::CalculationError;
use crate::calculations::common::{
    checked_powi, ensure_growth_rate, ensure_non_negative, percent, round_half_up,
};

const MAX_ROOT_ITERATIONS: u32 = 128;

const OVERFLOW: CalculationError = CalculationError::Overflow {
    operation: "amortization",
};

/// One month of an amortization schedule, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub installment: Decimal,
    pub amortization: Decimal,
    pub interest: Decimal,
    /// Outstanding balance after this month's payment, never below zero.
    pub balance: Decimal,
}

/// Converts an annual effective rate into the equivalent monthly rate.
///
/// Solves `x^12 = 1 + annual_rate` by Newton iteration, which stays in
/// decimal arithmetic instead of going through floating-point `powf`.
///
/// # Errors
///
/// Returns [`CalculationError::RateBelowMinusOne`] for rates below -1 and
/// [`CalculationError::Overflow`] when `1 + annual_rate` is not representable.
pub fn monthly_rate_from_annual(annual_rate: Decimal) -> Result<Decimal, CalculationError> {
    ensure_growth_rate("annual_rate", annual_rate)?;

    let target = Decimal::ONE.checked_add(annual_rate).ok_or(OVERFLOW)?;
    if target.is_zero() {
        return Ok(Decimal::NEGATIVE_ONE);
    }

    let eleven = Decimal::from(11);
    let twelve = Decimal::from(12);
    let tolerance = Decimal::new(1, 27);
    // Every decimal is below 2^96, so its twelfth root is below 2^8.
    let ceiling = Decimal::from(256);

    // (1 + i/12)^12 >= 1 + i, so the first guess sits at or above the root
    // and Newton descends onto it without overshooting. Staying above the
    // root keeps `target / root^11` below the root itself.
    let mut root = (Decimal::ONE + annual_rate / twelve).min(ceiling);
    for _ in 0..MAX_ROOT_ITERATIONS {
        let power_11 = checked_powi(root, 11)?;
        let next = target
            .checked_div(power_11)
            .and_then(|q| eleven.checked_mul(root).and_then(|r| r.checked_add(q)))
            .map(|sum| sum / twelve)
            .ok_or(OVERFLOW)?;
        let delta = root - next;
        root = next;
        if delta.abs() <= tolerance {
            break;
        }
    }

    Ok(root - Decimal::ONE)
}

fn validate_loan(
    principal: Decimal,
    annual_rate_pct: Decimal,
    months: u32,
) -> Result<Decimal, CalculationError> {
    ensure_non_negative("principal", principal)?;
    if months == 0 {
        return Err(CalculationError::ZeroPeriods);
    }
    monthly_rate_from_annual(percent(annual_rate_pct))
}

/// Constant-amortization (SAC) schedule.
///
/// # Errors
///
/// Returns [`CalculationError`] if the principal is negative, `months` is
/// zero, the rate is below -100% or the interest leaves the decimal range.
pub fn sac_schedule(
    principal: Decimal,
    annual_rate_pct: Decimal,
    months: u32,
) -> Result<Vec<AmortizationRow>, CalculationError> {
    let monthly_rate = validate_loan(principal, annual_rate_pct, months)?;

    let amortization = principal / Decimal::from(months);
    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = balance.checked_mul(monthly_rate).ok_or(OVERFLOW)?;
        let installment = amortization.checked_add(interest).ok_or(OVERFLOW)?;
        balance = balance.checked_sub(amortization).ok_or(OVERFLOW)?;

        rows.push(AmortizationRow {
            month,
            installment: round_half_up(installment),
            amortization: round_half_up(amortization),
            interest: round_half_up(interest),
            balance: round_half_up(balance.max(Decimal::ZERO)),
        });
    }

    Ok(rows)
}

/// Constant-installment (PRICE / French) schedule.
///
/// # Errors
///
/// Returns [`CalculationError`] if the principal is negative, `months` is
/// zero, the rate is below -100% or the installment leaves the decimal
/// range.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::price_schedule;
///
/// let rows = price_schedule(dec!(100000), dec!(12), 12).unwrap();
///
/// assert_eq!(rows[0].installment, dec!(8856.21));
/// assert_eq!(rows[11].installment, dec!(8856.21));
/// assert_eq!(rows[11].balance, dec!(0));
/// ```
pub fn price_schedule(
    principal: Decimal,
    annual_rate_pct: Decimal,
    months: u32,
) -> Result<Vec<AmortizationRow>, CalculationError> {
    let monthly_rate = validate_loan(principal, annual_rate_pct, months)?;

    let factor = checked_powi(Decimal::ONE + monthly_rate, months)?;
    let installment = if factor == Decimal::ONE {
        principal / Decimal::from(months)
    } else {
        monthly_rate
            .checked_mul(factor)
            .and_then(|f| principal.checked_mul(f))
            .and_then(|p| p.checked_div(factor - Decimal::ONE))
            .ok_or(OVERFLOW)?
    };

    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = balance.checked_mul(monthly_rate).ok_or(OVERFLOW)?;
        let amortization = installment.checked_sub(interest).ok_or(OVERFLOW)?;
        balance = balance.checked_sub(amortization).ok_or(OVERFLOW)?;

        rows.push(AmortizationRow {
            month,
            installment: round_half_up(installment),
            amortization: round_half_up(amortization),
            interest: round_half_up(interest),
            balance: round_half_up(balance.max(Decimal::ZERO)),
        });
    }

    Ok(rows)
}
