//! Monetary correction by a compound annual index.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::CalculationError;
use crate::calculations::common::{compound_factor, ensure_growth_rate, ensure_non_negative};

/// Corrects `base_value` forward by `years` years at `annual_rate`.
///
/// Returns `base_value × (1 + annual_rate) ^ years`, unrounded. Zero years
/// returns the base value unchanged, as does a zero rate. The function does
/// not know which economic index the rate came from; see
/// [`CorrectionIndex`](crate::CorrectionIndex) for the named rates.
///
/// # Errors
///
/// Returns [`CalculationError`] if:
/// - `base_value` is negative
/// - `annual_rate` is below -1
/// - the result leaves the decimal range
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::correct_value;
///
/// let corrected = correct_value(dec!(1000), dec!(0.039), 4).unwrap();
/// assert_eq!(corrected, dec!(1165.365589441));
/// ```
pub fn correct_value(
    base_value: Decimal,
    annual_rate: Decimal,
    years: u32,
) -> Result<Decimal, CalculationError> {
    ensure_non_negative("base_value", base_value)?;
    ensure_growth_rate("annual_rate", annual_rate)?;

    let factor = compound_factor(annual_rate, years)?;
    let corrected = base_value
        .checked_mul(factor)
        .ok_or(CalculationError::Overflow {
            operation: "value correction",
        })?;

    debug!(
        base = %base_value,
        rate = %annual_rate,
        years,
        corrected = %corrected,
        "value corrected"
    );

    Ok(corrected)
}
