//! Business performance and pricing indicators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::CalculationError;
use crate::calculations::common::{
    ensure_non_negative, percent, round_half_up, round_half_up_dp,
};

/// Simplified EBITDA: net revenue minus variable costs and fixed expenses.
///
/// The result may be negative (an operating loss).
///
/// # Errors
///
/// Returns [`CalculationError`] if an input is negative or the loss leaves
/// the decimal range.
pub fn ebitda(
    net_revenue: Decimal,
    variable_costs: Decimal,
    fixed_expenses: Decimal,
) -> Result<Decimal, CalculationError> {
    let revenue = ensure_non_negative("net_revenue", net_revenue)?;
    let variable = ensure_non_negative("variable_costs", variable_costs)?;
    let fixed = ensure_non_negative("fixed_expenses", fixed_expenses)?;

    let result = revenue
        .checked_sub(variable)
        .and_then(|r| r.checked_sub(fixed))
        .ok_or(CalculationError::Overflow { operation: "ebitda" })?;

    Ok(round_half_up(result))
}

/// Revenue needed to cover `fixed_costs` at a contribution margin of
/// `contribution_margin_pct` percent.
///
/// # Errors
///
/// Returns [`CalculationError::ZeroDivisor`] for a zero margin and
/// [`CalculationError::Overflow`] when the margin is too small to divide by.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::break_even;
///
/// assert_eq!(break_even(dec!(25000), dec!(40)).unwrap(), dec!(62500.00));
/// ```
pub fn break_even(
    fixed_costs: Decimal,
    contribution_margin_pct: Decimal,
) -> Result<Decimal, CalculationError> {
    let fixed = ensure_non_negative("fixed_costs", fixed_costs)?;
    let margin = percent(contribution_margin_pct);

    if margin.is_zero() {
        return Err(CalculationError::ZeroDivisor {
            name: "contribution_margin_pct",
        });
    }

    let revenue = fixed
        .checked_div(margin)
        .ok_or(CalculationError::Overflow {
            operation: "break-even",
        })?;

    Ok(round_half_up(revenue))
}

/// Sale price computed with a divisor markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupPrice {
    pub sale_price: Decimal,
    /// `1 / divisor`, four decimal places.
    pub markup_factor: Decimal,
    /// Profit portion of the sale price.
    pub nominal_profit: Decimal,
}

/// Prices a product so that sales taxes, sales expenses and the profit
/// margin (all percentages of the sale price) are covered:
/// `price = cost / (1 - (taxes + expenses + margin))`.
///
/// # Errors
///
/// Returns [`CalculationError::MarginsExceedPrice`] when the three
/// percentages add up to 100% or more, and [`CalculationError::Overflow`]
/// when the price leaves the decimal range.
pub fn markup_price(
    unit_cost: Decimal,
    sales_tax_pct: Decimal,
    sales_expense_pct: Decimal,
    profit_margin_pct: Decimal,
) -> Result<MarkupPrice, CalculationError> {
    let cost = ensure_non_negative("unit_cost", unit_cost)?;
    let overflow = CalculationError::Overflow { operation: "markup" };

    let total_pct = sales_tax_pct
        .checked_add(sales_expense_pct)
        .and_then(|t| t.checked_add(profit_margin_pct))
        .ok_or(overflow.clone())?;
    let divisor = Decimal::ONE
        .checked_sub(percent(total_pct))
        .ok_or(overflow.clone())?;

    if divisor <= Decimal::ZERO {
        return Err(CalculationError::MarginsExceedPrice { total: total_pct });
    }

    let sale_price = cost.checked_div(divisor).ok_or(overflow.clone())?;
    let markup_factor = Decimal::ONE.checked_div(divisor).ok_or(overflow.clone())?;
    let nominal_profit = sale_price
        .checked_mul(percent(profit_margin_pct))
        .ok_or(overflow)?;

    Ok(MarkupPrice {
        sale_price: round_half_up(sale_price),
        markup_factor: round_half_up_dp(markup_factor, 4),
        nominal_profit: round_half_up(nominal_profit),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn ebitda_subtracts_costs() {
        assert_eq!(
            ebitda(dec!(100000), dec!(40000), dec!(25000)),
            Ok(dec!(35000.00))
        );
    }

    #[test]
    fn ebitda_can_be_negative() {
        assert_eq!(ebitda(dec!(1000), dec!(800), dec!(500)), Ok(dec!(-300)));
    }

    #[test]
    fn ebitda_loss_beyond_decimal_range_is_overflow() {
        assert_eq!(
            ebitda(dec!(0), Decimal::MAX, Decimal::MAX),
            Err(CalculationError::Overflow { operation: "ebitda" })
        );
    }

    #[test]
    fn break_even_divides_by_margin() {
        assert_eq!(break_even(dec!(25000), dec!(40)), Ok(dec!(62500.00)));
    }

    #[test]
    fn break_even_rejects_zero_margin() {
        assert_eq!(
            break_even(dec!(1000), dec!(0)),
            Err(CalculationError::ZeroDivisor {
                name: "contribution_margin_pct",
            })
        );
    }

    #[test]
    fn break_even_with_vanishing_margin_is_overflow() {
        assert_eq!(
            break_even(dec!(1000000000000000000000), dec!(0.0000000001)),
            Err(CalculationError::Overflow {
                operation: "break-even",
            })
        );
    }

    #[test]
    fn markup_price_covers_taxes_expenses_and_margin() {
        let price = markup_price(dec!(100), dec!(10), dec!(15), dec!(20)).unwrap();

        assert_eq!(
            price,
            MarkupPrice {
                sale_price: dec!(181.82),
                markup_factor: dec!(1.8182),
                nominal_profit: dec!(36.36),
            }
        );
    }

    #[test]
    fn markup_price_rejects_margins_at_one_hundred_percent() {
        assert_eq!(
            markup_price(dec!(100), dec!(30), dec!(30), dec!(40)),
            Err(CalculationError::MarginsExceedPrice { total: dec!(100) })
        );
    }

    #[test]
    fn markup_price_with_vanishing_divisor_is_overflow() {
        assert_eq!(
            markup_price(Decimal::MAX, dec!(99.9999), dec!(0), dec!(0)),
            Err(CalculationError::Overflow { operation: "markup" })
        );
    }
}
