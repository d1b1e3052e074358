//! Gross-to-net payroll summary for a CLT employee.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | INSS withholding on the gross salary (progressive, capped) |
//! | 2    | IRRF base: gross − INSS − dependents × dependent deduction (minimum 0) |
//! | 3    | IRRF withholding on the base (simplified flat rate) |
//! | 4    | FGTS deposit: gross × FGTS rate (employer cost, not deducted) |
//! | 5    | Net salary: gross − INSS − IRRF − other deductions + benefits |
//!
//! Every line is rounded half-up to cents before it feeds the next step.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::TaxConfig;
//! use payroll_core::calculations::{PayrollInput, compute_payroll};
//!
//! let config = TaxConfig::brazil_2026().unwrap();
//! let summary = compute_payroll(&config, &PayrollInput::new(dec!(8000), 1)).unwrap();
//!
//! assert_eq!(summary.social_security, dec!(921.51));
//! assert_eq!(summary.income_tax_base, dec!(6888.90));
//! assert_eq!(summary.income_tax, dec!(519.45));
//! assert_eq!(summary.net_salary, dec!(6559.04));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{compute_bracket_tax, compute_simplified_income_tax};
use crate::TaxConfig;
use crate::calculations::CalculationError;
use crate::calculations::common::{ensure_non_negative, round_half_up};

const OVERFLOW: CalculationError = CalculationError::Overflow {
    operation: "net salary",
};

/// Inputs for one payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    pub gross_salary: Decimal,
    /// Number of dependents declared for IRRF purposes.
    pub dependents: u32,
    /// Deductions other than INSS and IRRF (health plan, advances, etc.).
    pub other_deductions: Decimal,
    /// Amounts added on top of the salary (allowances, bonuses).
    pub benefits: Decimal,
}

impl PayrollInput {
    /// Input with no other deductions and no benefits.
    pub fn new(
        gross_salary: Decimal,
        dependents: u32,
    ) -> Self {
        Self {
            gross_salary,
            dependents,
            other_deductions: Decimal::ZERO,
            benefits: Decimal::ZERO,
        }
    }
}

/// Result of a payroll calculation, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub gross_salary: Decimal,
    /// INSS withheld from the employee.
    pub social_security: Decimal,
    /// Base on which IRRF was computed.
    pub income_tax_base: Decimal,
    /// IRRF withheld from the employee.
    pub income_tax: Decimal,
    pub other_deductions: Decimal,
    pub benefits: Decimal,
    /// FGTS deposited by the employer; not part of the net salary.
    pub fgts: Decimal,
    pub net_salary: Decimal,
}

/// Runs the full gross-to-net calculation.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeAmount`] if the gross salary, other
/// deductions or benefits are negative, and [`CalculationError::Overflow`] if
/// a line leaves the decimal range.
pub fn compute_payroll(
    config: &TaxConfig,
    input: &PayrollInput,
) -> Result<PayrollSummary, CalculationError> {
    let gross = round_half_up(ensure_non_negative("gross_salary", input.gross_salary)?);
    let other_deductions = round_half_up(ensure_non_negative(
        "other_deductions",
        input.other_deductions,
    )?);
    let benefits = round_half_up(ensure_non_negative("benefits", input.benefits)?);

    // Step 1: INSS
    let social_security = round_half_up(compute_bracket_tax(config, gross)?);

    // Step 2: IRRF base
    let income_tax_base = income_tax_base(config, gross, social_security, input.dependents)?;

    // Step 3: IRRF
    let income_tax = round_half_up(compute_simplified_income_tax(config, income_tax_base)?);

    // Step 4: FGTS
    let fgts = round_half_up(gross.checked_mul(config.fgts_rate()).ok_or(OVERFLOW)?);

    // Step 5: Net salary
    let net_salary = net_salary(gross, social_security, income_tax, other_deductions, benefits)?;

    debug!(
        gross = %gross,
        inss = %social_security,
        irrf = %income_tax,
        net = %net_salary,
        "payroll computed"
    );

    Ok(PayrollSummary {
        gross_salary: gross,
        social_security,
        income_tax_base,
        income_tax,
        other_deductions,
        benefits,
        fgts,
        net_salary,
    })
}

fn income_tax_base(
    config: &TaxConfig,
    gross: Decimal,
    social_security: Decimal,
    dependents: u32,
) -> Result<Decimal, CalculationError> {
    let deduction = config
        .dependents_deduction(dependents)
        .ok_or(CalculationError::Overflow {
            operation: "dependent deduction",
        })?;
    // INSS never exceeds gross; all three terms are non-negative.
    let base = gross - social_security - deduction;
    if base < Decimal::ZERO {
        debug!(
            gross = %gross,
            dependents,
            "Dependent deductions exceed remaining salary; IRRF base floored at zero"
        );
        return Ok(Decimal::ZERO);
    }
    Ok(round_half_up(base))
}

fn net_salary(
    gross: Decimal,
    social_security: Decimal,
    income_tax: Decimal,
    other_deductions: Decimal,
    benefits: Decimal,
) -> Result<Decimal, CalculationError> {
    let net = gross
        .checked_sub(social_security)
        .and_then(|n| n.checked_sub(income_tax))
        .and_then(|n| n.checked_sub(other_deductions))
        .and_then(|n| n.checked_add(benefits))
        .ok_or(OVERFLOW)?;
    if net < Decimal::ZERO {
        warn!(
            gross = %gross,
            other_deductions = %other_deductions,
            net = %net,
            "Deductions exceed gross salary; net salary is negative"
        );
    }
    Ok(round_half_up(net))
}
