mod config_error;
mod correction_index;
mod projection_point;
mod tax_bracket;
mod tax_config;

pub use config_error::ConfigurationError;
pub use correction_index::CorrectionIndex;
pub use projection_point::{ProjectionPoint, YearlyProjection};
pub use tax_bracket::{Bracket, BracketTable};
pub use tax_config::{TaxConfig, TaxRules};
