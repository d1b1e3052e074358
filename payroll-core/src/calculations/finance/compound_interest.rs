//! Compound interest on a lump sum with fixed monthly deposits.
//!
//! Closed form, deposits at the end of each month:
//!
//! ```text
//! total = P(1 + i)^n + A((1 + i)^n - 1) / i
//! ```
//!
//! With a zero rate the deposit term is `A × n`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::CalculationError;
use crate::calculations::common::{
    compound_factor, ensure_non_negative, percent, round_half_up,
};

const OVERFLOW: CalculationError = CalculationError::Overflow {
    operation: "compound interest",
};

/// Outcome of a compound-interest calculation, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundInterest {
    pub total_value: Decimal,
    /// Principal plus every monthly deposit.
    pub total_invested: Decimal,
    pub interest_earned: Decimal,
}

/// Grows `principal` and `monthly_deposit` for `months` months at
/// `monthly_rate_pct` percent per month.
///
/// Unlike [`project_compound_growth`](crate::calculations::project_compound_growth),
/// the principal starts invested and each deposit earns interest only from
/// the month after it is made.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] for a negative principal,
/// rate or deposit, and [`CalculationError::Overflow`] if the total leaves
/// the decimal range.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::compound_interest;
///
/// let result = compound_interest(dec!(1000), dec!(10), 2, dec!(0)).unwrap();
/// assert_eq!(result.total_value, dec!(1210.00));
/// ```
pub fn compound_interest(
    principal: Decimal,
    monthly_rate_pct: Decimal,
    months: u32,
    monthly_deposit: Decimal,
) -> Result<CompoundInterest, CalculationError> {
    ensure_non_negative("principal", principal)?;
    ensure_non_negative("monthly_rate_pct", monthly_rate_pct)?;
    ensure_non_negative("monthly_deposit", monthly_deposit)?;

    let rate = percent(monthly_rate_pct);
    let factor = compound_factor(rate, months)?;

    let grown_principal = principal.checked_mul(factor).ok_or(OVERFLOW)?;
    let deposited = monthly_deposit
        .checked_mul(Decimal::from(months))
        .ok_or(OVERFLOW)?;
    let grown_deposits = if rate.is_zero() {
        deposited
    } else {
        (factor - Decimal::ONE)
            .checked_div(rate)
            .and_then(|annuity| annuity.checked_mul(monthly_deposit))
            .ok_or(OVERFLOW)?
    };

    let total = grown_principal.checked_add(grown_deposits).ok_or(OVERFLOW)?;
    let invested = principal.checked_add(deposited).ok_or(OVERFLOW)?;

    Ok(CompoundInterest {
        total_value: round_half_up(total),
        total_invested: round_half_up(invested),
        interest_earned: round_half_up(total - invested),
    })
}
