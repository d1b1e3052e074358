//! Total monthly cost of an employee to the employer.
//!
//! On top of the gross salary the employer pays FGTS, a provision for
//! vacation and 13th salary, and the employer payroll charges (CPP, RAT and
//! the "Sistema S" contributions).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::CalculationError;
use crate::calculations::common::{ensure_non_negative, round_half_up};

const OVERFLOW: CalculationError = CalculationError::Overflow {
    operation: "employer cost",
};

/// Employer charge rates, each a fraction of gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCostRates {
    pub fgts: Decimal,
    /// Vacation, vacation bonus and 13th salary accrued per month.
    pub vacation_and_thirteenth: Decimal,
    /// Employer social-security contribution (CPP).
    pub employer_social_security: Decimal,
    /// Work-accident insurance (RAT).
    pub accident_insurance: Decimal,
    /// Third-party "Sistema S" contributions.
    pub third_party: Decimal,
}

impl Default for EmployerCostRates {
    /// Rates for a company outside the simplified tax regime.
    fn default() -> Self {
        Self {
            fgts: Decimal::new(8, 2),
            vacation_and_thirteenth: Decimal::new(1111, 4),
            employer_social_security: Decimal::new(20, 2),
            accident_insurance: Decimal::new(2, 2),
            third_party: Decimal::new(58, 3),
        }
    }
}

/// Employer cost breakdown, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCost {
    pub gross_salary: Decimal,
    /// CPP + RAT + Sistema S.
    pub social_charges: Decimal,
    pub fgts: Decimal,
    pub provisions: Decimal,
    pub total_monthly_cost: Decimal,
    /// Total charges as a percentage of gross salary.
    pub percentage_over_gross: Decimal,
}

/// Computes the employer's monthly cost for `gross_salary`.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] if `gross_salary` is negative
/// and [`CalculationError::Overflow`] if the total leaves the decimal range.
pub fn compute_employer_cost(
    gross_salary: Decimal,
    rates: &EmployerCostRates,
) -> Result<EmployerCost, CalculationError> {
    let gross = ensure_non_negative("gross_salary", gross_salary)?;

    let charge_rate = rates
        .employer_social_security
        .checked_add(rates.accident_insurance)
        .and_then(|r| r.checked_add(rates.third_party))
        .ok_or(OVERFLOW)?;

    let fgts = gross.checked_mul(rates.fgts).ok_or(OVERFLOW)?;
    let provisions = gross
        .checked_mul(rates.vacation_and_thirteenth)
        .ok_or(OVERFLOW)?;
    let social_charges = gross.checked_mul(charge_rate).ok_or(OVERFLOW)?;

    let charges = fgts
        .checked_add(provisions)
        .and_then(|c| c.checked_add(social_charges))
        .ok_or(OVERFLOW)?;
    let total = gross.checked_add(charges).ok_or(OVERFLOW)?;

    let percentage_over_gross = if gross.is_zero() {
        warn!("Gross salary is zero; employer cost percentage reported as zero");
        Decimal::ZERO
    } else {
        let share = charges.checked_div(gross).ok_or(OVERFLOW)?;
        round_half_up(share.checked_mul(Decimal::ONE_HUNDRED).ok_or(OVERFLOW)?)
    };

    Ok(EmployerCost {
        gross_salary: gross,
        social_charges: round_half_up(social_charges),
        fgts: round_half_up(fgts),
        provisions: round_half_up(provisions),
        total_monthly_cost: round_half_up(total),
        percentage_over_gross,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_rates_for_five_thousand() {
        let cost = compute_employer_cost(dec!(5000), &EmployerCostRates::default()).unwrap();

        assert_eq!(cost.fgts, dec!(400.00));
        assert_eq!(cost.provisions, dec!(555.50));
        assert_eq!(cost.social_charges, dec!(1390.00));
        assert_eq!(cost.total_monthly_cost, dec!(7345.50));
        assert_eq!(cost.percentage_over_gross, dec!(46.91));
    }

    #[test]
    fn zero_salary_reports_zero_percentage() {
        let cost = compute_employer_cost(dec!(0), &EmployerCostRates::default()).unwrap();

        assert_eq!(cost.total_monthly_cost, dec!(0));
        assert_eq!(cost.percentage_over_gross, dec!(0));
    }

    #[test]
    fn custom_rates_are_applied() {
        let rates = EmployerCostRates {
            fgts: dec!(0.08),
            vacation_and_thirteenth: dec!(0),
            employer_social_security: dec!(0),
            accident_insurance: dec!(0),
            third_party: dec!(0),
        };

        let cost = compute_employer_cost(dec!(1000), &rates).unwrap();

        assert_eq!(cost.total_monthly_cost, dec!(1080.00));
        assert_eq!(cost.percentage_over_gross, dec!(8.00));
    }

    #[test]
    fn total_beyond_decimal_range_is_overflow() {
        assert_eq!(
            compute_employer_cost(Decimal::MAX, &EmployerCostRates::default()),
            Err(CalculationError::Overflow {
                operation: "employer cost",
            })
        );
    }

    #[test]
    fn negative_salary_is_rejected() {
        assert!(compute_employer_cost(dec!(-5), &EmployerCostRates::default()).is_err());
    }
}
