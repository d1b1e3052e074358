//! Simplified income-tax (IRRF) withholding.
//!
//! Bases at or below the exemption line withhold nothing; everything above it
//! is taxed at a single rate instead of the statutory multi-band table.

use rust_decimal::Decimal;

use crate::TaxConfig;
use crate::calculations::CalculationError;
use crate::calculations::common::ensure_non_negative;

/// Computes the simplified income-tax withholding on `taxable_base`.
///
/// Returns `(taxable_base - exemption) × rate`, or zero when the base does not
/// exceed the exemption. The value is not rounded.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] if `taxable_base` is negative.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::TaxConfig;
/// use payroll_core::calculations::compute_simplified_income_tax;
///
/// let config = TaxConfig::brazil_2026().unwrap();
///
/// assert_eq!(compute_simplified_income_tax(&config, dec!(6000)).unwrap(), dec!(275));
/// assert_eq!(compute_simplified_income_tax(&config, dec!(5000)).unwrap(), dec!(0));
/// ```
pub fn compute_simplified_income_tax(
    config: &TaxConfig,
    taxable_base: Decimal,
) -> Result<Decimal, CalculationError> {
    ensure_non_negative("taxable_base", taxable_base)?;

    if taxable_base <= config.income_tax_exemption() {
        return Ok(Decimal::ZERO);
    }

    Ok((taxable_base - config.income_tax_exemption()) * config.simplified_income_tax_rate())
}
