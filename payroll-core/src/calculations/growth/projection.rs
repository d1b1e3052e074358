//! Compounding projection of a fixed monthly contribution.
//!
//! Each period the contribution is deposited first and the whole balance is
//! then grown by the period rate:
//!
//! ```text
//! contributed[i] = contributed[i-1] + contribution
//! total[i]       = (total[i-1] + contribution) × (1 + rate)
//! ```
//!
//! Depositing before growth (rather than after) makes every contribution earn
//! interest in the period it is made.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::CalculationError;
use crate::calculations::common::{ensure_growth_rate, ensure_non_negative, round_half_up};
use crate::{ProjectionPoint, YearlyProjection};

const MONTHS_PER_YEAR: u32 = 12;

/// A validated compounding projection.
///
/// The projection itself holds no running state; [`CompoundGrowth::iter`]
/// starts a fresh pass from period 1 every time it is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompoundGrowth {
    contribution: Decimal,
    rate: Decimal,
    periods: u32,
}

impl CompoundGrowth {
    pub fn contribution(&self) -> Decimal {
        self.contribution
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// Iterates the projection from the first period.
    pub fn iter(&self) -> CompoundGrowthIter {
        CompoundGrowthIter {
            contribution: self.contribution,
            growth_factor: Decimal::ONE.saturating_add(self.rate),
            periods: self.periods,
            period: 0,
            contributed: Decimal::ZERO,
            total_value: Decimal::ZERO,
        }
    }
}

impl IntoIterator for CompoundGrowth {
    type Item = ProjectionPoint;
    type IntoIter = CompoundGrowthIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &CompoundGrowth {
    type Item = ProjectionPoint;
    type IntoIter = CompoundGrowthIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the points of a [`CompoundGrowth`].
///
/// Balances saturate at [`Decimal::MAX`] instead of overflowing, so the
/// iterator always yields exactly `periods` points.
#[derive(Debug, Clone)]
pub struct CompoundGrowthIter {
    contribution: Decimal,
    growth_factor: Decimal,
    periods: u32,
    period: u32,
    contributed: Decimal,
    total_value: Decimal,
}

impl Iterator for CompoundGrowthIter {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.period >= self.periods {
            return None;
        }

        self.period += 1;
        self.contributed = self.contributed.saturating_add(self.contribution);
        self.total_value = self
            .total_value
            .saturating_add(self.contribution)
            .saturating_mul(self.growth_factor);

        Some(ProjectionPoint {
            period: self.period,
            contributed: self.contributed,
            grown: self.total_value - self.contributed,
            total_value: self.total_value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.periods - self.period) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CompoundGrowthIter {}

/// Builds a projection of `monthly_contribution` growing at `monthly_rate`
/// over `periods` months.
///
/// # Errors
///
/// Returns [`CalculationError`] if:
/// - `monthly_contribution` is negative
/// - `monthly_rate` is below -1
/// - `periods` is zero
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::project_compound_growth;
///
/// let projection = project_compound_growth(dec!(200), dec!(0.008), 3).unwrap();
/// let points: Vec<_> = projection.iter().collect();
///
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[0].total_value, dec!(201.6));
/// assert_eq!(points[2].contributed, dec!(600));
/// assert_eq!(points[2].total_value, dec!(609.6513024));
/// ```
pub fn project_compound_growth(
    monthly_contribution: Decimal,
    monthly_rate: Decimal,
    periods: u32,
) -> Result<CompoundGrowth, CalculationError> {
    ensure_non_negative("monthly_contribution", monthly_contribution)?;
    ensure_growth_rate("monthly_rate", monthly_rate)?;
    if periods == 0 {
        return Err(CalculationError::ZeroPeriods);
    }

    Ok(CompoundGrowth {
        contribution: monthly_contribution,
        rate: monthly_rate,
        periods,
    })
}

/// Rolls a monthly projection up into one row per year.
///
/// Each row reports the cumulative figures at the end of that year, rounded
/// to cents.
///
/// # Errors
///
/// Same as [`project_compound_growth`], plus [`CalculationError::Overflow`]
/// if `years` in months does not fit a `u32`.
pub fn project_yearly(
    monthly_contribution: Decimal,
    monthly_rate: Decimal,
    years: u32,
) -> Result<Vec<YearlyProjection>, CalculationError> {
    let periods = years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(CalculationError::Overflow {
            operation: "years to months",
        })?;
    let projection = project_compound_growth(monthly_contribution, monthly_rate, periods)?;

    Ok(projection
        .iter()
        .filter(|point| point.period % MONTHS_PER_YEAR == 0)
        .map(|point| YearlyProjection {
            year: point.period / MONTHS_PER_YEAR,
            total_invested: round_half_up(point.contributed),
            interest_earned: round_half_up(point.grown),
            total_value: round_half_up(point.total_value),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // project_compound_growth tests
    // =========================================================================

    #[test]
    fn three_periods_deposit_then_grow() {
        let points: Vec<_> = project_compound_growth(dec!(200), dec!(0.008), 3)
            .unwrap()
            .iter()
            .collect();

        assert_eq!(
            points,
            vec![
                ProjectionPoint {
                    period: 1,
                    contributed: dec!(200),
                    grown: dec!(1.6),
                    total_value: dec!(201.6),
                },
                ProjectionPoint {
                    period: 2,
                    contributed: dec!(400),
                    grown: dec!(4.8128),
                    total_value: dec!(404.8128),
                },
                ProjectionPoint {
                    period: 3,
                    contributed: dec!(600),
                    grown: dec!(9.6513024),
                    total_value: dec!(609.6513024),
                },
            ]
        );
    }

    #[test]
    fn iter_restarts_from_first_period() {
        let projection = project_compound_growth(dec!(100), dec!(0.01), 5).unwrap();

        let first: Vec<_> = projection.iter().collect();
        let second: Vec<_> = projection.iter().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn iterator_reports_exact_length() {
        let projection = project_compound_growth(dec!(100), dec!(0.01), 12).unwrap();

        assert_eq!(projection.iter().len(), 12);
    }

    #[test]
    fn zero_periods_is_rejected() {
        assert_eq!(
            project_compound_growth(dec!(100), dec!(0.01), 0),
            Err(CalculationError::ZeroPeriods)
        );
    }

    #[test]
    fn negative_contribution_is_rejected() {
        assert!(matches!(
            project_compound_growth(dec!(-100), dec!(0.01), 3),
            Err(CalculationError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn rate_below_minus_one_is_rejected() {
        assert!(matches!(
            project_compound_growth(dec!(100), dec!(-1.5), 3),
            Err(CalculationError::RateBelowMinusOne { .. })
        ));
    }

    #[test]
    fn huge_contribution_saturates_instead_of_panicking() {
        let projection = project_compound_growth(Decimal::MAX, dec!(0.5), 4).unwrap();

        let last = projection.iter().last().unwrap();

        assert_eq!(last.period, 4);
        assert_eq!(last.total_value, Decimal::MAX);
    }

    #[test]
    fn huge_rate_saturates_instead_of_panicking() {
        let points: Vec<_> = project_compound_growth(dec!(100), Decimal::MAX, 2)
            .unwrap()
            .iter()
            .collect();

        assert_eq!(points.len(), 2);
        assert_eq!(points[1].total_value, Decimal::MAX);
        assert_eq!(points[1].contributed, dec!(200));
    }

    // =========================================================================
    // project_yearly tests
    // =========================================================================

    #[test]
    fn yearly_rows_report_year_end_balances() {
        // 20% of a 4498.49 net salary at 0.8% a month
        let rows = project_yearly(dec!(899.698), dec!(0.008), 10).unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(
            rows[0],
            YearlyProjection {
                year: 1,
                total_invested: dec!(10796.38),
                interest_earned: dec!(578.21),
                total_value: dec!(11374.59),
            }
        );
        assert_eq!(
            rows[9],
            YearlyProjection {
                year: 10,
                total_invested: dec!(107963.76),
                interest_earned: dec!(73612.58),
                total_value: dec!(181576.34),
            }
        );
    }

    #[test]
    fn yearly_zero_years_is_rejected() {
        assert_eq!(
            project_yearly(dec!(100), dec!(0.01), 0),
            Err(CalculationError::ZeroPeriods)
        );
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_yields_exactly_periods_points(
            contribution_cents in 0u64..1_000_000,
            rate_bp in 0u32..300,
            periods in 1u32..240
        ) {
            let projection = project_compound_growth(
                Decimal::new(contribution_cents as i64, 2),
                Decimal::new(rate_bp as i64, 4),
                periods,
            ).unwrap();

            prop_assert_eq!(projection.iter().count(), periods as usize);
        }

        #[test]
        fn prop_contributed_steps_by_contribution(
            contribution_cents in 0u64..1_000_000,
            rate_bp in 0u32..300,
            periods in 1u32..120
        ) {
            let contribution = Decimal::new(contribution_cents as i64, 2);
            let projection = project_compound_growth(
                contribution,
                Decimal::new(rate_bp as i64, 4),
                periods,
            ).unwrap();

            let mut previous = Decimal::ZERO;
            for point in projection.iter() {
                prop_assert_eq!(point.contributed - previous, contribution);
                prop_assert!(point.total_value >= point.contributed);
                previous = point.contributed;
            }
        }

        #[test]
        fn prop_zero_rate_total_equals_contributed(
            contribution_cents in 0u64..1_000_000,
            periods in 1u32..240
        ) {
            let projection = project_compound_growth(
                Decimal::new(contribution_cents as i64, 2),
                Decimal::ZERO,
                periods,
            ).unwrap();

            for point in projection.iter() {
                prop_assert_eq!(point.total_value, point.contributed);
                prop_assert_eq!(point.grown, Decimal::ZERO);
            }
        }
    }
}
