//! Configuration for a simulation run

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::monte_carlo::SimulationConfig;

/// Everything a run needs, with defaults matching the reference run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// CoinGecko coin id (e.g., "bitcoin")
    pub coin_id: String,

    /// Quote currency (e.g., "usd")
    pub vs_currency: String,

    /// First day of the history window (00:00 UTC)
    pub start_date: NaiveDate,

    /// End of the history window (00:00 UTC)
    pub end_date: NaiveDate,

    /// Date to fetch the current price for; `None` uses the last historical price
    pub current_price_date: Option<NaiveDate>,

    /// Collapse the history to one closing price per UTC day before computing changes
    pub resample_daily: bool,

    pub simulation: SimulationConfig,

    /// Histogram bin count
    pub bins: usize,

    /// Where to write the histogram; `None` skips rendering
    pub chart_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            coin_id: "bitcoin".to_string(),
            vs_currency: "usd".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 11, 10).unwrap_or_default(),
            current_price_date: NaiveDate::from_ymd_opt(2024, 11, 12),
            resample_daily: false,
            simulation: SimulationConfig::default(),
            bins: 50,
            chart_path: Some(PathBuf::from("bitcoin_monte_carlo.png")),
        }
    }
}

impl RunConfig {
    pub fn range_start(&self) -> DateTime<Utc> {
        midnight_utc(self.start_date)
    }

    pub fn range_end(&self) -> DateTime<Utc> {
        midnight_utc(self.end_date)
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}
