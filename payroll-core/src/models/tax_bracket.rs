use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// One marginal band of a progressive withholding table.
///
/// The band starts where the previous one ends (or at zero for the first
/// band) and runs up to and including `upper_bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper_bound: Decimal,
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { upper_bound, rate }
    }
}

/// An ordered, validated sequence of [`Bracket`]s anchored at zero.
///
/// Construction fails if the table is empty, if any bound does not strictly
/// increase over the previous one, or if any rate is negative. Once built the
/// table is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - `brackets` is empty
    /// - an upper bound is zero/negative or not strictly greater than the previous one
    /// - a rate is negative
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, ConfigurationError> {
        if brackets.is_empty() {
            return Err(ConfigurationError::EmptyBracketTable);
        }

        let mut previous = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.upper_bound <= previous {
                return Err(ConfigurationError::NonIncreasingBound {
                    index,
                    previous,
                    bound: bracket.upper_bound,
                });
            }
            if bracket.rate < Decimal::ZERO {
                return Err(ConfigurationError::NegativeRate {
                    index,
                    rate: bracket.rate,
                });
            }
            previous = bracket.upper_bound;
        }

        Ok(Self { brackets })
    }

    /// Brackets in ascending `upper_bound` order.
    pub fn iter(&self) -> impl Iterator<Item = &Bracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Upper bound of the last bracket.
    pub fn top_bound(&self) -> Decimal {
        self.brackets
            .last()
            .map(|b| b.upper_bound)
            .unwrap_or(Decimal::ZERO)
    }
}

impl<'de> Deserialize<'de> for BracketTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let brackets = Vec::<Bracket>::deserialize(deserializer)?;
        BracketTable::new(brackets).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_accepts_strictly_increasing_bounds() {
        let table = BracketTable::new(vec![
            Bracket::new(dec!(1621.00), dec!(0.075)),
            Bracket::new(dec!(2902.84), dec!(0.09)),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.top_bound(), dec!(2902.84));
    }

    #[test]
    fn new_rejects_empty_table() {
        assert_eq!(
            BracketTable::new(vec![]),
            Err(ConfigurationError::EmptyBracketTable)
        );
    }

    #[test]
    fn new_rejects_equal_bounds() {
        let result = BracketTable::new(vec![
            Bracket::new(dec!(1000), dec!(0.05)),
            Bracket::new(dec!(1000), dec!(0.10)),
        ]);

        assert_eq!(
            result,
            Err(ConfigurationError::NonIncreasingBound {
                index: 1,
                previous: dec!(1000),
                bound: dec!(1000),
            })
        );
    }

    #[test]
    fn new_rejects_zero_first_bound() {
        let result = BracketTable::new(vec![Bracket::new(dec!(0), dec!(0.05))]);

        assert!(matches!(
            result,
            Err(ConfigurationError::NonIncreasingBound { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_negative_rate() {
        let result = BracketTable::new(vec![
            Bracket::new(dec!(1000), dec!(0.05)),
            Bracket::new(dec!(2000), dec!(-0.01)),
        ]);

        assert_eq!(
            result,
            Err(ConfigurationError::NegativeRate {
                index: 1,
                rate: dec!(-0.01),
            })
        );
    }
}
