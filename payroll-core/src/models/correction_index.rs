use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Named economic indexes offered for value correction, with their
/// projected 2026-2030 annual rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrectionIndex {
    /// Real minimum-wage growth.
    MinimumWage,
    /// General consumer inflation (IPCA).
    Ipca,
    /// General market price index (IGP-M).
    Igpm,
}

impl CorrectionIndex {
    pub fn all() -> &'static [CorrectionIndex] {
        &[Self::MinimumWage, Self::Ipca, Self::Igpm]
    }

    pub fn annual_rate(&self) -> Decimal {
        match self {
            Self::MinimumWage => Decimal::new(4, 2),
            Self::Ipca => Decimal::new(39, 3),
            Self::Igpm => Decimal::new(6, 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinimumWage => "minimo",
            Self::Ipca => "inflacao",
            Self::Igpm => "igpm",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "minimo" => Some(Self::MinimumWage),
            "inflacao" => Some(Self::Ipca),
            "igpm" => Some(Self::Igpm),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MinimumWage => "Salário Mínimo Real",
            Self::Ipca => "IPCA",
            Self::Igpm => "IGP-M",
        }
    }
}

impl std::fmt::Display for CorrectionIndex {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_round_trips_every_code() {
        for index in CorrectionIndex::all() {
            assert_eq!(CorrectionIndex::parse(index.as_str()), Some(*index));
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(CorrectionIndex::parse("selic"), None);
    }

    #[test]
    fn annual_rates_match_projection() {
        assert_eq!(CorrectionIndex::MinimumWage.annual_rate(), dec!(0.04));
        assert_eq!(CorrectionIndex::Ipca.annual_rate(), dec!(0.039));
        assert_eq!(CorrectionIndex::Igpm.annual_rate(), dec!(0.06));
    }
}
