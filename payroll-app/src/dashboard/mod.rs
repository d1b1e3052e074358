//! Dashboard orchestration.
//!
//! A [`Dashboard`] turns one set of user inputs into everything the screen
//! shows: the payroll breakdown, the employer cost, the ten-year investment
//! table, the monthly chart and the corrected value for the selected index.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Payroll summary for the gross salary and dependents |
//! | 2    | Employer cost for the gross salary |
//! | 3    | Monthly contribution: net salary × contribution share |
//! | 4    | Investment table over the projection horizon |
//! | 5    | Chart series over the chart horizon |
//! | 6    | Correction of the base value by the selected index |
//!
//! The chart is only replaced once every step has succeeded, so a rejected
//! input leaves the previous chart on screen.

mod chart;
mod debounce;

pub use chart::ChartState;
pub use debounce::{Debounced, Debouncer};

use payroll_core::calculations::common::round_half_up;
use payroll_core::calculations::{
    CalculationError, EmployerCost, EmployerCostRates, PayrollInput, PayrollSummary,
    compute_employer_cost, compute_payroll, correct_value, project_compound_growth,
    project_yearly,
};
use payroll_core::{CorrectionIndex, TaxConfig, YearlyProjection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;

/// Horizons and rates the dashboard projects with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub contribution_share: Decimal,
    pub monthly_rate: Decimal,
    pub chart_periods: u32,
    pub projection_years: u32,
    pub correction_years: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for DashboardSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            contribution_share: config.contribution_share,
            monthly_rate: config.monthly_rate,
            chart_periods: config.chart_periods,
            projection_years: config.projection_years,
            correction_years: config.correction_years,
        }
    }
}

/// One set of user inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardInput {
    pub gross_salary: Decimal,
    pub dependents: u32,
    /// Value to correct; independent of the salary.
    pub correction_base: Decimal,
    pub index: CorrectionIndex,
}

impl DashboardInput {
    pub fn new(
        gross_salary: Decimal,
        dependents: u32,
    ) -> Self {
        Self {
            gross_salary,
            dependents,
            correction_base: Decimal::ZERO,
            index: CorrectionIndex::Ipca,
        }
    }
}

/// Everything recalculated for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub payroll: PayrollSummary,
    pub employer_cost: EmployerCost,
    /// Monthly amount invested, rounded to cents.
    pub monthly_contribution: Decimal,
    pub investment: Vec<YearlyProjection>,
    pub chart: ChartState,
    pub index: CorrectionIndex,
    /// Correction base grown by the index, rounded to cents.
    pub corrected_value: Decimal,
}

pub struct Dashboard {
    tax_config: TaxConfig,
    employer_rates: EmployerCostRates,
    settings: DashboardSettings,
    chart: ChartState,
}

impl Dashboard {
    pub fn new(
        tax_config: TaxConfig,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            tax_config,
            employer_rates: EmployerCostRates::default(),
            settings,
            chart: ChartState::new(),
        }
    }

    /// Chart as of the last successful recalculation.
    pub fn chart(&self) -> &ChartState {
        &self.chart
    }

    /// Recalculates the whole view for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if any input is negative, a configured
    /// horizon is zero or a figure leaves the decimal range. The chart is left
    /// unchanged in that case.
    pub fn recalculate(
        &mut self,
        input: &DashboardInput,
    ) -> Result<DashboardView, CalculationError> {
        // Step 1
        let payroll = compute_payroll(
            &self.tax_config,
            &PayrollInput::new(input.gross_salary, input.dependents),
        )?;

        // Step 2
        let employer_cost = compute_employer_cost(input.gross_salary, &self.employer_rates)?;

        // Step 3
        let contribution = payroll
            .net_salary
            .checked_mul(self.settings.contribution_share)
            .ok_or(CalculationError::Overflow {
                operation: "monthly contribution",
            })?
            .max(Decimal::ZERO);

        // Step 4
        let investment = project_yearly(
            contribution,
            self.settings.monthly_rate,
            self.settings.projection_years,
        )?;

        // Step 5
        let chart_points = project_compound_growth(
            contribution,
            self.settings.monthly_rate,
            self.settings.chart_periods,
        )?;

        // Step 6
        let corrected = correct_value(
            input.correction_base,
            input.index.annual_rate(),
            self.settings.correction_years,
        )?;

        self.chart.update(chart_points);

        debug!(
            gross = %input.gross_salary,
            net = %payroll.net_salary,
            contribution = %contribution,
            index = %input.index,
            "dashboard recalculated"
        );

        Ok(DashboardView {
            payroll,
            employer_cost,
            monthly_contribution: round_half_up(contribution),
            investment,
            chart: self.chart.clone(),
            index: input.index,
            corrected_value: round_half_up(corrected),
        })
    }
}
