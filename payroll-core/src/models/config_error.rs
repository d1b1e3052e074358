use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building a [`TaxConfig`](super::TaxConfig) or a
/// [`BracketTable`](super::BracketTable).
///
/// These are detected once, at construction time. A configuration that
/// passed validation never produces them during a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The bracket table has no brackets.
    #[error("bracket table must contain at least one bracket")]
    EmptyBracketTable,

    /// A bracket bound is not strictly greater than the one before it.
    #[error("bracket {index} upper bound {bound} must be greater than {previous}")]
    NonIncreasingBound {
        index: usize,
        previous: Decimal,
        bound: Decimal,
    },

    /// A bracket carries a negative marginal rate.
    #[error("bracket {index} rate must be non-negative, got {rate}")]
    NegativeRate { index: usize, rate: Decimal },

    /// The last bracket bound differs from the withholding cap.
    #[error("withholding cap {cap} must equal the last bracket bound {last_bound}")]
    CapMismatch { cap: Decimal, last_bound: Decimal },

    /// A monetary setting is negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    /// A rate setting falls outside [0, 1].
    #[error("{name} must be between 0 and 1, got {rate}")]
    RateOutOfRange { name: &'static str, rate: Decimal },
}
