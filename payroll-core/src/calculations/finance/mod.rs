//! Business, loan and cash-flow calculators.

pub mod amortization;
pub mod business;
pub mod cash_flow;
pub mod compound_interest;

pub use amortization::{AmortizationRow, monthly_rate_from_annual, price_schedule, sac_schedule};
pub use business::{MarkupPrice, break_even, ebitda, markup_price};
pub use cash_flow::{internal_rate_of_return, net_present_value};
pub use compound_interest::{CompoundInterest, compound_interest};
