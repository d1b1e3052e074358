//! Discounted cash-flow analysis.
//!
//! Flows are indexed by period: `flows[0]` happens now, `flows[t]` after `t`
//! periods.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::CalculationError;
use crate::calculations::common::{
    checked_powi, ensure_growth_rate, percent, round_half_up, round_half_up_dp,
};

const IRR_MAX_ITERATIONS: u32 = 100;

const OVERFLOW: CalculationError = CalculationError::Overflow {
    operation: "discounting",
};

/// Net present value of `flows` at `discount_rate_pct` percent per period,
/// rounded to cents.
///
/// # Errors
///
/// Returns [`CalculationError`] if the series is empty, the rate is -100% or
/// lower, or a discount factor overflows.
pub fn net_present_value(
    discount_rate_pct: Decimal,
    flows: &[Decimal],
) -> Result<Decimal, CalculationError> {
    if flows.is_empty() {
        return Err(CalculationError::EmptyCashFlows);
    }
    let rate = ensure_growth_rate("discount_rate", percent(discount_rate_pct))?;

    Ok(round_half_up(npv_at(rate, flows)?))
}

/// Internal rate of return of `flows` in percent, four decimal places.
///
/// Uses Newton-Raphson starting from `guess` (a fraction, e.g. `0.1`) and
/// stops once the NPV is within 0.0001 of zero.
///
/// # Errors
///
/// Returns [`CalculationError::NoConvergence`] if the derivative vanishes,
/// the iterate leaves the domain (rate ≤ -1) or 100 iterations pass without
/// reaching the tolerance.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::internal_rate_of_return;
///
/// let irr = internal_rate_of_return(&[dec!(-1000), dec!(1100)], dec!(0.1)).unwrap();
/// assert_eq!(irr, dec!(10.0000));
/// ```
pub fn internal_rate_of_return(
    flows: &[Decimal],
    guess: Decimal,
) -> Result<Decimal, CalculationError> {
    if flows.is_empty() {
        return Err(CalculationError::EmptyCashFlows);
    }

    let tolerance = Decimal::new(1, 4);
    let mut rate = guess;

    for iteration in 0..IRR_MAX_ITERATIONS {
        if rate <= Decimal::NEGATIVE_ONE {
            break;
        }

        // A diverging iterate eventually overflows; that is a failure to
        // converge, not an arithmetic error the caller can act on.
        let Ok(npv) = npv_at(rate, flows) else {
            break;
        };
        if npv.abs() < tolerance {
            debug!(iteration, rate = %rate, "IRR converged");
            return Ok(round_half_up_dp(rate * Decimal::ONE_HUNDRED, 4));
        }

        let Ok(derivative) = npv_derivative_at(rate, flows) else {
            break;
        };
        let Some(next) = npv
            .checked_div(derivative)
            .and_then(|step| rate.checked_sub(step))
        else {
            break;
        };
        rate = next;
    }

    Err(CalculationError::NoConvergence {
        iterations: IRR_MAX_ITERATIONS,
    })
}

fn npv_at(
    rate: Decimal,
    flows: &[Decimal],
) -> Result<Decimal, CalculationError> {
    let base = Decimal::ONE + rate;
    if base.is_zero() {
        return Err(CalculationError::ZeroDivisor {
            name: "discount_rate",
        });
    }

    let mut total = Decimal::ZERO;
    for (t, flow) in flows.iter().enumerate() {
        let discounted = discount(*flow, base, t as u32)?;
        total = total.checked_add(discounted).ok_or(OVERFLOW)?;
    }
    Ok(total)
}

fn npv_derivative_at(
    rate: Decimal,
    flows: &[Decimal],
) -> Result<Decimal, CalculationError> {
    let base = Decimal::ONE + rate;

    let mut total = Decimal::ZERO;
    for (t, flow) in flows.iter().enumerate() {
        let t = t as u32;
        let weighted = flow.checked_mul(Decimal::from(t)).ok_or(OVERFLOW)?;
        let discounted = discount(weighted, base, t + 1)?;
        total = total.checked_sub(discounted).ok_or(OVERFLOW)?;
    }
    Ok(total)
}

/// `flow / base^periods`
fn discount(
    flow: Decimal,
    base: Decimal,
    periods: u32,
) -> Result<Decimal, CalculationError> {
    let factor = checked_powi(base, periods)?;
    flow.checked_div(factor).ok_or(OVERFLOW)
}
