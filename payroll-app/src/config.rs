//! Application configuration.
//!
//! Read from a TOML file; every key is optional and falls back to the
//! defaults below. Command-line flags override whatever the file says.
//!
//! ```toml
//! rules_file = "rules_2026.toml"
//! log_level = "debug"
//! contribution_share = "0.25"
//! chart_periods = 24
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use payroll_core::{TaxConfig, TaxRules};
use payroll_data::{LoaderError, RuleSetLoader};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{name} must be between 0 and 1, got {value}")]
    ShareOutOfRange { name: &'static str, value: Decimal },

    #[error("{name} must be positive")]
    ZeroHorizon { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// TOML rule set to use instead of the built-in 2026 rules.
    pub rules_file: Option<PathBuf>,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// File to append log records to, in addition to stderr.
    pub log_file: Option<PathBuf>,
    /// Fraction of the net salary invested each month.
    pub contribution_share: Decimal,
    /// Monthly growth rate of the investment.
    pub monthly_rate: Decimal,
    /// Months shown in the chart.
    pub chart_periods: u32,
    /// Years in the investment table.
    pub projection_years: u32,
    /// Years over which the correction index is applied.
    pub correction_years: u32,
    /// Quiet period before a burst of inputs is recalculated.
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_file: None,
            log_level: "info".to_string(),
            log_file: None,
            contribution_share: Decimal::new(20, 2),
            monthly_rate: Decimal::new(8, 3),
            chart_periods: 12,
            projection_years: 10,
            correction_years: 4,
            debounce_ms: 300,
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config file read");
        Self::from_toml_str(&source)
    }

    /// Checks the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contribution_share < Decimal::ZERO || self.contribution_share > Decimal::ONE {
            return Err(ConfigError::ShareOutOfRange {
                name: "contribution_share",
                value: self.contribution_share,
            });
        }
        if self.chart_periods == 0 {
            return Err(ConfigError::ZeroHorizon {
                name: "chart_periods",
            });
        }
        if self.projection_years == 0 {
            return Err(ConfigError::ZeroHorizon {
                name: "projection_years",
            });
        }
        Ok(())
    }

    /// The payroll rules to calculate with: the configured rules file, or
    /// the built-in 2026 rules when none is set.
    pub fn tax_config(&self) -> Result<TaxConfig, LoaderError> {
        match &self.rules_file {
            Some(path) => {
                debug!(path = %path.display(), "loading rule set");
                RuleSetLoader::load_from_file(path)
            }
            None => Ok(TaxConfig::from_rules(TaxRules::brazil_2026())?),
        }
    }
}
