//! Progressive social-security (INSS) withholding.
//!
//! The withholding base is the gross salary clamped to the configured cap.
//! Each bracket taxes only the slice of the base that falls inside it, so the
//! result is a marginal sum rather than a single rate applied to the whole
//! salary.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::TaxConfig;
//! use payroll_core::calculations::compute_bracket_tax;
//!
//! let config = TaxConfig::brazil_2026().unwrap();
//!
//! // 1621 × 7.5% + 1281.84 × 9% + 97.16 × 12%
//! let tax = compute_bracket_tax(&config, dec!(3000)).unwrap();
//! assert_eq!(tax, dec!(248.5998));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxConfig;
use crate::calculations::CalculationError;
use crate::calculations::common::ensure_non_negative;

/// Computes the social-security withholding for `gross_salary`.
///
/// Salaries above the withholding cap are taxed as if they were exactly the
/// cap. A salary sitting on a bracket boundary is fully taxed by the lower
/// bracket. The returned value is not rounded.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] if `gross_salary` is negative.
pub fn compute_bracket_tax(
    config: &TaxConfig,
    gross_salary: Decimal,
) -> Result<Decimal, CalculationError> {
    ensure_non_negative("gross_salary", gross_salary)?;

    let base = gross_salary.min(config.withholding_cap());
    if base < gross_salary {
        debug!(
            gross_salary = %gross_salary,
            cap = %config.withholding_cap(),
            "Gross salary above withholding cap; clamping base"
        );
    }

    let mut previous_bound = Decimal::ZERO;
    let mut accumulated = Decimal::ZERO;

    for bracket in config.bracket_table().iter() {
        if base <= previous_bound {
            break;
        }
        let slice = base.min(bracket.upper_bound) - previous_bound;
        accumulated += slice * bracket.rate;
        previous_bound = bracket.upper_bound;
    }

    Ok(accumulated)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Bracket, TaxRules};

    fn config() -> TaxConfig {
        TaxConfig::brazil_2026().unwrap()
    }

    fn single_bracket_config(
        max: Decimal,
        rate: Decimal,
    ) -> TaxConfig {
        let mut rules = TaxRules::brazil_2026();
        rules.brackets = vec![Bracket::new(max, rate)];
        rules.withholding_cap = max;
        TaxConfig::from_rules(rules).unwrap()
    }

    // =========================================================================
    // fixed points
    // =========================================================================

    #[test]
    fn zero_salary_withholds_nothing() {
        assert_eq!(compute_bracket_tax(&config(), dec!(0)), Ok(dec!(0)));
    }

    #[test]
    fn minimum_wage_falls_entirely_in_first_bracket() {
        assert_eq!(
            compute_bracket_tax(&config(), dec!(1621.00)),
            Ok(dec!(121.575))
        );
    }

    #[test]
    fn salary_in_third_bracket_sums_marginal_slices() {
        assert_eq!(
            compute_bracket_tax(&config(), dec!(3000)),
            Ok(dec!(248.5998))
        );
    }

    #[test]
    fn salary_in_top_bracket() {
        assert_eq!(
            compute_bracket_tax(&config(), dec!(5000)),
            Ok(dec!(501.5144))
        );
    }

    #[test]
    fn salary_at_cap_uses_every_bracket() {
        assert_eq!(
            compute_bracket_tax(&config(), dec!(8475.55)),
            Ok(dec!(988.0914))
        );
    }

    #[test]
    fn salary_above_cap_is_clamped() {
        assert_eq!(
            compute_bracket_tax(&config(), dec!(25000)),
            Ok(dec!(988.0914))
        );
    }

    #[test]
    fn boundary_value_stays_in_lower_bracket() {
        // 2902.84 is the top of the 9% band; nothing reaches the 12% band.
        let tax = compute_bracket_tax(&config(), dec!(2902.84)).unwrap();

        assert_eq!(tax, dec!(121.575) + dec!(1281.84) * dec!(0.09));
    }

    #[test]
    fn negative_salary_is_rejected() {
        assert_eq!(
            compute_bracket_tax(&config(), dec!(-1)),
            Err(CalculationError::NegativeAmount {
                name: "gross_salary",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn single_bracket_behaves_as_flat_rate_below_bound() {
        let config = single_bracket_config(dec!(1000), dec!(0.10));

        assert_eq!(compute_bracket_tax(&config, dec!(400)), Ok(dec!(40)));
        assert_eq!(compute_bracket_tax(&config, dec!(5000)), Ok(dec!(100)));
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_non_decreasing_in_salary(
            low_cents in 0u64..2_000_000,
            delta_cents in 0u64..500_000
        ) {
            let low = Decimal::new(low_cents as i64, 2);
            let high = Decimal::new((low_cents + delta_cents) as i64, 2);
            let config = config();

            let low_tax = compute_bracket_tax(&config, low).unwrap();
            let high_tax = compute_bracket_tax(&config, high).unwrap();

            prop_assert!(high_tax >= low_tax);
        }

        #[test]
        fn prop_constant_above_cap(extra_cents in 0u64..10_000_000) {
            let config = config();
            let salary = config.withholding_cap() + Decimal::new(extra_cents as i64, 2);

            prop_assert_eq!(
                compute_bracket_tax(&config, salary).unwrap(),
                compute_bracket_tax(&config, config.withholding_cap()).unwrap()
            );
        }

        #[test]
        fn prop_single_bracket_is_clamped_flat_rate(
            salary_cents in 0u64..5_000_000,
            max_cents in 1u64..2_000_000,
            rate_bp in 0u32..10_000
        ) {
            let salary = Decimal::new(salary_cents as i64, 2);
            let max = Decimal::new(max_cents as i64, 2);
            let rate = Decimal::new(rate_bp as i64, 4);
            let config = single_bracket_config(max, rate);

            prop_assert_eq!(
                compute_bracket_tax(&config, salary).unwrap(),
                salary.min(max) * rate
            );
        }
    }
}
