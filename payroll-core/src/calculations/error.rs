use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the calculators for inputs they refuse to compute.
///
/// None of these are raised for a valid input; the calculators reject
/// rather than silently clamp.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A monetary input was negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    /// A projection was requested over zero periods.
    #[error("period count must be positive")]
    ZeroPeriods,

    /// A growth rate below -100% would flip the sign of the balance.
    #[error("{name} must be at least -1, got {rate}")]
    RateBelowMinusOne { name: &'static str, rate: Decimal },

    /// A value used as a divisor was zero.
    #[error("{name} must not be zero")]
    ZeroDivisor { name: &'static str },

    /// Taxes, expenses and profit together consume the whole sale price.
    #[error("taxes, expenses and margin add up to {total}%, leaving nothing to price against")]
    MarginsExceedPrice { total: Decimal },

    /// A cash-flow analysis was given no flows.
    #[error("cash flow series is empty")]
    EmptyCashFlows,

    /// An iterative solver did not reach the tolerance.
    #[error("solver did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    /// An intermediate value left the representable decimal range.
    #[error("arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },
}
