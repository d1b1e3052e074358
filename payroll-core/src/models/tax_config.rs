use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Bracket, BracketTable, ConfigurationError};

/// Raw payroll rule set for one year, as written in a rules file.
///
/// Nothing here is validated; turn it into a [`TaxConfig`] with
/// [`TaxConfig::from_rules`] before calculating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRules {
    pub tax_year: i32,
    pub minimum_wage: Decimal,
    /// Maximum base subject to social-security (INSS) withholding.
    pub withholding_cap: Decimal,
    pub brackets: Vec<Bracket>,
    /// Income-tax (IRRF) base at or below which nothing is withheld.
    pub income_tax_exemption: Decimal,
    /// Single rate applied above the exemption line.
    pub simplified_income_tax_rate: Decimal,
    /// Amount subtracted from the income-tax base per dependent.
    pub dependent_deduction: Decimal,
    /// Employer FGTS deposit as a fraction of gross salary.
    pub fgts_rate: Decimal,
}

impl TaxRules {
    /// The 2026 Brazilian CLT rule set.
    ///
    /// INSS bands follow the 2026 minimum wage of R$ 1.621,00. IRRF uses the
    /// R$ 5.000,00 exemption with a flat 27.5% above it, a visual
    /// approximation rather than the statutory table.
    pub fn brazil_2026() -> Self {
        Self {
            tax_year: 2026,
            minimum_wage: Decimal::new(162100, 2),
            withholding_cap: Decimal::new(847555, 2),
            brackets: vec![
                Bracket::new(Decimal::new(162100, 2), Decimal::new(75, 3)),
                Bracket::new(Decimal::new(290284, 2), Decimal::new(9, 2)),
                Bracket::new(Decimal::new(435427, 2), Decimal::new(12, 2)),
                Bracket::new(Decimal::new(847555, 2), Decimal::new(14, 2)),
            ],
            income_tax_exemption: Decimal::new(500000, 2),
            simplified_income_tax_rate: Decimal::new(275, 3),
            dependent_deduction: Decimal::new(18959, 2),
            fgts_rate: Decimal::new(8, 2),
        }
    }
}

/// Validated, immutable payroll configuration.
///
/// Built once at startup and shared freely; every calculator takes it by
/// reference and none of them mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxConfig {
    tax_year: i32,
    minimum_wage: Decimal,
    withholding_cap: Decimal,
    bracket_table: BracketTable,
    income_tax_exemption: Decimal,
    simplified_income_tax_rate: Decimal,
    dependent_deduction: Decimal,
    fgts_rate: Decimal,
}

impl TaxConfig {
    /// Validates a raw rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - the bracket table is empty, non-increasing or has a negative rate
    /// - the withholding cap is not the last bracket bound
    /// - any monetary setting is negative
    /// - any rate setting is outside [0, 1]
    pub fn from_rules(rules: TaxRules) -> Result<Self, ConfigurationError> {
        let bracket_table = BracketTable::new(rules.brackets)?;

        if rules.withholding_cap != bracket_table.top_bound() {
            return Err(ConfigurationError::CapMismatch {
                cap: rules.withholding_cap,
                last_bound: bracket_table.top_bound(),
            });
        }

        non_negative("minimum_wage", rules.minimum_wage)?;
        non_negative("income_tax_exemption", rules.income_tax_exemption)?;
        non_negative("dependent_deduction", rules.dependent_deduction)?;
        unit_rate("simplified_income_tax_rate", rules.simplified_income_tax_rate)?;
        unit_rate("fgts_rate", rules.fgts_rate)?;

        Ok(Self {
            tax_year: rules.tax_year,
            minimum_wage: rules.minimum_wage,
            withholding_cap: rules.withholding_cap,
            bracket_table,
            income_tax_exemption: rules.income_tax_exemption,
            simplified_income_tax_rate: rules.simplified_income_tax_rate,
            dependent_deduction: rules.dependent_deduction,
            fgts_rate: rules.fgts_rate,
        })
    }

    /// Shorthand for `TaxConfig::from_rules(TaxRules::brazil_2026())`.
    pub fn brazil_2026() -> Result<Self, ConfigurationError> {
        Self::from_rules(TaxRules::brazil_2026())
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn minimum_wage(&self) -> Decimal {
        self.minimum_wage
    }

    pub fn withholding_cap(&self) -> Decimal {
        self.withholding_cap
    }

    pub fn bracket_table(&self) -> &BracketTable {
        &self.bracket_table
    }

    pub fn income_tax_exemption(&self) -> Decimal {
        self.income_tax_exemption
    }

    pub fn simplified_income_tax_rate(&self) -> Decimal {
        self.simplified_income_tax_rate
    }

    pub fn dependent_deduction(&self) -> Decimal {
        self.dependent_deduction
    }

    /// Total dependent deduction for `dependents` dependents, or `None` if it
    /// leaves the decimal range.
    pub fn dependents_deduction(
        &self,
        dependents: u32,
    ) -> Option<Decimal> {
        Decimal::from(dependents).checked_mul(self.dependent_deduction)
    }

    pub fn fgts_rate(&self) -> Decimal {
        self.fgts_rate
    }
}

fn non_negative(
    name: &'static str,
    value: Decimal,
) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeAmount { name, value });
    }
    Ok(())
}

fn unit_rate(
    name: &'static str,
    rate: Decimal,
) -> Result<(), ConfigurationError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigurationError::RateOutOfRange { name, rate });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn brazil_2026_rules_validate() {
        let config = TaxConfig::brazil_2026().unwrap();

        assert_eq!(config.tax_year(), 2026);
        assert_eq!(config.minimum_wage(), dec!(1621.00));
        assert_eq!(config.withholding_cap(), dec!(8475.55));
        assert_eq!(config.bracket_table().len(), 4);
        assert_eq!(config.income_tax_exemption(), dec!(5000.00));
        assert_eq!(config.simplified_income_tax_rate(), dec!(0.275));
    }

    #[test]
    fn from_rules_rejects_cap_that_differs_from_last_bound() {
        let mut rules = TaxRules::brazil_2026();
        rules.withholding_cap = dec!(9000.00);

        assert_eq!(
            TaxConfig::from_rules(rules),
            Err(ConfigurationError::CapMismatch {
                cap: dec!(9000.00),
                last_bound: dec!(8475.55),
            })
        );
    }

    #[test]
    fn from_rules_propagates_bracket_errors() {
        let mut rules = TaxRules::brazil_2026();
        rules.brackets.swap(0, 1);

        assert!(matches!(
            TaxConfig::from_rules(rules),
            Err(ConfigurationError::NonIncreasingBound { index: 1, .. })
        ));
    }

    #[test]
    fn from_rules_rejects_negative_exemption() {
        let mut rules = TaxRules::brazil_2026();
        rules.income_tax_exemption = dec!(-1);

        assert_eq!(
            TaxConfig::from_rules(rules),
            Err(ConfigurationError::NegativeAmount {
                name: "income_tax_exemption",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn from_rules_rejects_income_tax_rate_above_one() {
        let mut rules = TaxRules::brazil_2026();
        rules.simplified_income_tax_rate = dec!(1.5);

        assert_eq!(
            TaxConfig::from_rules(rules),
            Err(ConfigurationError::RateOutOfRange {
                name: "simplified_income_tax_rate",
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn dependents_deduction_scales_with_count() {
        let config = TaxConfig::brazil_2026().unwrap();

        assert_eq!(config.dependents_deduction(0), Some(dec!(0)));
        assert_eq!(config.dependents_deduction(2), Some(dec!(379.18)));
    }
}
