//! Growth calculators: compounding projections and index correction.

pub mod indexation;
pub mod projection;

pub use indexation::correct_value;
pub use projection::{CompoundGrowth, CompoundGrowthIter, project_compound_growth, project_yearly};
