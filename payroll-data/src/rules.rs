use std::fs;
use std::path::Path;

use payroll_core::{TaxConfig, TaxRules};

use crate::loader::{BracketLoader, BracketRecord, LoaderError};

/// Loader for complete payroll rule sets written in TOML.
///
/// A rules file carries every field of [`TaxRules`], with the withholding
/// bands as an array of `[[brackets]]` tables. Decimal values may be written
/// as strings (`"1621.00"`) to keep them exact.
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse raw rules without validating them.
    pub fn parse_rules(source: &str) -> Result<TaxRules, LoaderError> {
        Ok(toml::from_str(source)?)
    }

    /// Parse and validate a rule set.
    pub fn from_toml_str(source: &str) -> Result<TaxConfig, LoaderError> {
        let rules = Self::parse_rules(source)?;
        Ok(TaxConfig::from_rules(rules)?)
    }

    /// Read raw rules from a file.
    pub fn read_rules(path: impl AsRef<Path>) -> Result<TaxRules, LoaderError> {
        let source = fs::read_to_string(path)?;
        Self::parse_rules(&source)
    }

    /// Read and validate a rule set from a file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<TaxConfig, LoaderError> {
        let rules = Self::read_rules(path)?;
        Ok(TaxConfig::from_rules(rules)?)
    }

    /// Replace the bands in `rules` with the CSV rows for the same year.
    ///
    /// The withholding cap is moved to the new top bound so the result still
    /// validates.
    pub fn with_bracket_records(
        mut rules: TaxRules,
        records: &[BracketRecord],
    ) -> Result<TaxRules, LoaderError> {
        let table = BracketLoader::table_for_year(records, rules.tax_year)?;

        rules.withholding_cap = table.top_bound();
        rules.brackets = table.iter().copied().collect();

        Ok(rules)
    }
}
