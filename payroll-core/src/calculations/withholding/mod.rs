//! Payroll withholding calculators.
//!
//! This module holds the social-security and income-tax calculators and the
//! summaries built on top of them.

pub mod employer_cost;
pub mod income_tax;
pub mod payroll;
pub mod social_security;

pub use employer_cost::{EmployerCost, EmployerCostRates, compute_employer_cost};
pub use income_tax::compute_simplified_income_tax;
pub use payroll::{PayrollInput, PayrollSummary, compute_payroll};
pub use social_security::compute_bracket_tax;
