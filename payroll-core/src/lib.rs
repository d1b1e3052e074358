pub mod calculations;
pub mod models;

pub use calculations::CalculationError;
pub use models::*;
