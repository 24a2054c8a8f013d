// Library crate - price history, statistics and Monte Carlo forecasting

pub mod types;
pub mod statistics;
pub mod monte_carlo;
pub mod provider;
pub mod coingecko;
pub mod config;
pub mod pipeline;
pub mod chart;
pub mod report;

// Re-export commonly used types
pub use types::*;
pub use config::RunConfig;
pub use monte_carlo::{simulate, CompoundingMode, SimulationConfig, SimulationResult};
pub use provider::PriceProvider;
pub use statistics::ChangeStatistics;
