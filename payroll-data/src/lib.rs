//! Loading payroll rule sets and bracket tables from files.

mod loader;
mod rules;

pub use loader::{BracketLoader, BracketRecord, LoaderError};
pub use rules::RuleSetLoader;
