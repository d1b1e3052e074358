pub mod config;
pub mod dashboard;
pub mod logging;
pub mod utils;

pub use config::{AppConfig, ConfigError};
pub use dashboard::{
    ChartState, Dashboard, DashboardInput, DashboardSettings, DashboardView, Debounced, Debouncer,
};
