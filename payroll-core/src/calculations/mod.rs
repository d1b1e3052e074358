//! Payroll, growth and finance calculators.
//!
//! Every function here is pure and synchronous: it reads its arguments (and
//! a shared, immutable [`TaxConfig`](crate::TaxConfig) where needed), performs
//! no I/O and keeps no state between calls.

pub mod common;
mod error;
pub mod finance;
pub mod growth;
pub mod withholding;

pub use error::CalculationError;
pub use finance::{
    AmortizationRow, CompoundInterest, MarkupPrice, break_even, compound_interest, ebitda,
    internal_rate_of_return, markup_price, monthly_rate_from_annual, net_present_value,
    price_schedule, sac_schedule,
};
pub use growth::{CompoundGrowth, correct_value, project_compound_growth, project_yearly};
pub use withholding::{
    EmployerCost, EmployerCostRates, PayrollInput, PayrollSummary, compute_bracket_tax,
    compute_employer_cost, compute_payroll, compute_simplified_income_tax,
};
