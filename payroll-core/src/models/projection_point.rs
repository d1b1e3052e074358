use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One period of a compounding projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-based period number.
    pub period: u32,
    /// Sum of all contributions up to and including this period.
    pub contributed: Decimal,
    /// Growth earned so far (`total_value - contributed`).
    pub grown: Decimal,
    pub total_value: Decimal,
}

/// A projection rolled up to one row per year, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: u32,
    pub total_invested: Decimal,
    pub interest_earned: Decimal,
    pub total_value: Decimal,
}
