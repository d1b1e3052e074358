use payroll_core::ProjectionPoint;
use payroll_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use serde::Serialize;

/// Data behind the projection chart: one label and two series values per
/// month.
///
/// The state is owned by whoever renders it and is replaced wholesale on
/// every [`ChartState::update`]; nothing is appended or patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartState {
    labels: Vec<String>,
    total_value: Vec<Decimal>,
    contributed: Vec<Decimal>,
}

impl ChartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every series with the given points, rounded to cents.
    pub fn update<I>(
        &mut self,
        points: I,
    ) where
        I: IntoIterator<Item = ProjectionPoint>,
    {
        let points = points.into_iter();
        let (capacity, _) = points.size_hint();

        let mut labels = Vec::with_capacity(capacity);
        let mut total_value = Vec::with_capacity(capacity);
        let mut contributed = Vec::with_capacity(capacity);

        for point in points {
            labels.push(format!("Mês {}", point.period));
            total_value.push(round_half_up(point.total_value));
            contributed.push(round_half_up(point.contributed));
        }

        *self = Self {
            labels,
            total_value,
            contributed,
        };
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Cumulative balance ("Patrimônio").
    pub fn total_value(&self) -> &[Decimal] {
        &self.total_value
    }

    /// Cumulative amount deposited ("Investido").
    pub fn contributed(&self) -> &[Decimal] {
        &self.contributed
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use payroll_core::calculations::project_compound_growth;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn update_fills_labels_and_both_series() {
        let mut chart = ChartState::new();

        chart.update(project_compound_growth(dec!(200), dec!(0.008), 3).unwrap());

        assert_eq!(chart.labels(), ["Mês 1", "Mês 2", "Mês 3"]);
        assert_eq!(
            chart.total_value(),
            [dec!(201.60), dec!(404.81), dec!(609.65)]
        );
        assert_eq!(chart.contributed(), [dec!(200), dec!(400), dec!(600)]);
    }

    #[test]
    fn update_replaces_previous_series() {
        let mut chart = ChartState::new();
        chart.update(project_compound_growth(dec!(100), dec!(0.01), 12).unwrap());

        chart.update(project_compound_growth(dec!(50), dec!(0), 2).unwrap());

        assert_eq!(chart.len(), 2);
        assert_eq!(chart.contributed(), [dec!(50), dec!(100)]);
        assert_eq!(chart.total_value(), [dec!(50), dec!(100)]);
    }

    #[test]
    fn new_chart_is_empty() {
        assert!(ChartState::new().is_empty());
    }
}
