use std::io::Read;

use payroll_core::{Bracket, BracketTable, ConfigurationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading rule sets or bracket tables.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tax year {0} not found in bracket data")]
    TaxYearNotFound(i32),

    #[error("Invalid rule set: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for LoaderError {
    fn from(err: toml::de::Error) -> Self {
        LoaderError::TomlParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `tax_year`: The year the band applies to (e.g., 2026)
/// - `upper_bound`: Upper edge of the band, inclusive
/// - `rate`: Marginal rate as a fraction (e.g., 0.075 for 7.5%)
///
/// Each band starts where the previous row for the same year ends, so rows
/// must be listed in ascending order per year.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub upper_bound: Decimal,
    pub rate: Decimal,
}

/// Loader for withholding bracket tables from CSV files.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, LoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build the validated table for `tax_year`, keeping file order.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::TaxYearNotFound`] if no row matches the year,
    /// or [`LoaderError::Configuration`] if the rows do not form a valid
    /// table.
    pub fn table_for_year(
        records: &[BracketRecord],
        tax_year: i32,
    ) -> Result<BracketTable, LoaderError> {
        let brackets: Vec<Bracket> = records
            .iter()
            .filter(|r| r.tax_year == tax_year)
            .map(|r| Bracket::new(r.upper_bound, r.rate))
            .collect();

        if brackets.is_empty() {
            return Err(LoaderError::TaxYearNotFound(tax_year));
        }

        Ok(BracketTable::new(brackets)?)
    }

    /// Distinct years present in `records`, ascending.
    pub fn years(records: &[BracketRecord]) -> Vec<i32> {
        let mut years: Vec<i32> = records.iter().map(|r| r.tax_year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"tax_year,upper_bound,rate
2025,1518.00,0.075
2025,2793.88,0.09
2025,4190.83,0.12
2025,8157.41,0.14
2026,1621.00,0.075
2026,2902.84,0.09
2026,4354.27,0.12
2026,8475.55,0.14
"#;

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "tax_year,upper_bound,rate\n2026,1621.00,0.075";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                tax_year: 2026,
                upper_bound: dec!(1621.00),
                rate: dec!(0.075),
            }]
        );
    }

    #[test]
    fn test_parse_csv_all_years() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 8);
        assert_eq!(BracketLoader::years(&records), vec![2025, 2026]);
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "tax_year,upper_bound\n2026,1621.00";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let LoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "tax_year,upper_bound,rate\n2026,abc,0.075";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for bad decimal");

        assert!(matches!(err, LoaderError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = "tax_year,upper_bound,rate\n";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // table_for_year tests
    // =========================================================================

    #[test]
    fn test_table_for_year_selects_rows() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        let table = BracketLoader::table_for_year(&records, 2026).expect("Should build table");

        assert_eq!(table.len(), 4);
        assert_eq!(table.top_bound(), dec!(8475.55));
    }

    #[test]
    fn test_table_for_year_unknown_year() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        let err = BracketLoader::table_for_year(&records, 2030).expect_err("Should fail");

        assert!(matches!(err, LoaderError::TaxYearNotFound(2030)));
    }

    #[test]
    fn test_table_for_year_rejects_unordered_rows() {
        let csv = "tax_year,upper_bound,rate\n2026,2902.84,0.09\n2026,1621.00,0.075";
        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let err = BracketLoader::table_for_year(&records, 2026).expect_err("Should fail");

        match err {
            LoaderError::Configuration(ConfigurationError::NonIncreasingBound { index, .. }) => {
                assert_eq!(index, 1);
            }
            other => panic!("expected NonIncreasingBound, got {other:?}"),
        }
    }
}
