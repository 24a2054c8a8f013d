//! Fetch → statistics → simulation

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::monte_carlo::{simulate, SimulationResult};
use crate::provider::{PriceProvider, RequestError};
use crate::statistics::ChangeStatistics;

/// Where the reference price for the simulation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Point-in-time fetch succeeded
    Fetched,
    /// Point-in-time fetch failed or was disabled; last historical price used
    LastClose,
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetched => write!(f, "fetched"),
            Self::LastClose => write!(f, "last close"),
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub series_len: usize,
    pub statistics: ChangeStatistics,
    pub current_price: f64,
    pub price_source: PriceSource,
    pub result: SimulationResult,
}

/// Run one simulation against `provider`.
///
/// A failed history fetch ends the run. A failed current-price fetch falls
/// back to the last price in the history, unless the response came back but
/// could not be understood.
pub async fn run<P: PriceProvider>(provider: &P, config: &RunConfig) -> Result<RunOutcome> {
    let mut series = provider
        .fetch_range(config.range_start(), config.range_end())
        .await
        .context("Failed to fetch price history")?;

    if config.resample_daily {
        series = series.daily_closes();
        info!("Resampled to {} daily closes", series.len());
    }

    if series.len() < 2 {
        bail!("Not enough price history: {} points, need at least 2", series.len());
    }

    let statistics = ChangeStatistics::from_series(&series);
    if !statistics.is_defined() {
        bail!(
            "Not enough price history to estimate volatility ({} changes)",
            statistics.count
        );
    }
    info!(
        "Change statistics over {} changes: mean {:.4}%, std dev {:.4}%",
        statistics.count, statistics.mean, statistics.std_dev
    );

    let last_close = series
        .last_price()
        .ok_or_else(|| anyhow!("Price history is empty"))?;

    let (current_price, price_source) = match config.current_price_date {
        Some(date) => match provider.fetch_price_on(date).await {
            Ok(price) => (price, PriceSource::Fetched),
            Err(e) if e.downcast_ref::<RequestError>().is_none() => {
                return Err(e.context("Failed to read current price"));
            }
            Err(e) => {
                warn!("Could not fetch current price ({:#}), using last close {:.2}", e, last_close);
                (last_close, PriceSource::LastClose)
            }
        },
        None => (last_close, PriceSource::LastClose),
    };
    info!("Current price: {:.2} ({})", current_price, price_source);

    let result = simulate(current_price, &statistics, &config.simulation)?;
    info!("Completed {} simulations", result.len());

    Ok(RunOutcome {
        series_len: series.len(),
        statistics,
        current_price,
        price_source,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::SimulationConfig;
    use crate::types::PriceSeries;
    use chrono::{DateTime, NaiveDate, Utc};
    use std::cell::Cell;

    /// In-memory provider with call counting
    struct FixtureProvider {
        history: Option<Vec<f64>>,
        current: Option<f64>,
        malformed_current: bool,
        range_calls: Cell<usize>,
        point_calls: Cell<usize>,
    }

    impl FixtureProvider {
        fn new(history: Option<Vec<f64>>, current: Option<f64>) -> Self {
            Self {
                history,
                current,
                malformed_current: false,
                range_calls: Cell::new(0),
                point_calls: Cell::new(0),
            }
        }

        /// Current-price responses arrive but cannot be parsed
        fn malformed_current(mut self) -> Self {
            self.malformed_current = true;
            self
        }
    }

    impl PriceProvider for FixtureProvider {
        async fn fetch_range(&self, from: DateTime<Utc>, _to: DateTime<Utc>) -> Result<PriceSeries> {
            self.range_calls.set(self.range_calls.get() + 1);
            match &self.history {
                Some(prices) => Ok(PriceSeries::from_daily_prices(from.date_naive(), prices)),
                None => Err(RequestError::Status {
                    status: 500,
                    message: "boom".to_string(),
                }
                .into()),
            }
        }

        async fn fetch_price_on(&self, _date: NaiveDate) -> Result<f64> {
            self.point_calls.set(self.point_calls.get() + 1);
            if self.malformed_current {
                let err = serde_json::from_str::<serde_json::Value>("<html>not json</html>").unwrap_err();
                return Err(anyhow::Error::new(err).context("Failed to parse response"));
            }
            self.current.ok_or_else(|| {
                RequestError::Status {
                    status: 429,
                    message: "rate limited".to_string(),
                }
                .into()
            })
        }
    }

    fn config() -> RunConfig {
        RunConfig {
            simulation: SimulationConfig {
                simulation_count: 200,
                ..SimulationConfig::default()
            },
            chart_path: None,
            ..RunConfig::default()
        }
    }

    #[tokio::test]
    async fn test_history_failure_is_fatal() {
        let provider = FixtureProvider::new(None, Some(90_000.0));
        let err = run(&provider, &config()).await.unwrap_err();

        assert!(format!("{:#}", err).contains("500"));
        assert_eq!(provider.range_calls.get(), 1);
        assert_eq!(provider.point_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_uses_fetched_current_price() {
        let provider = FixtureProvider::new(Some(vec![100.0, 102.0, 101.0, 104.0]), Some(110.0));
        let outcome = run(&provider, &config()).await.unwrap();

        assert_eq!(outcome.price_source, PriceSource::Fetched);
        assert_eq!(outcome.current_price, 110.0);
        assert_eq!(outcome.result.current_price, 110.0);
        assert_eq!(outcome.result.len(), 200);
        assert_eq!(outcome.series_len, 4);
        assert_eq!(outcome.statistics.count, 3);
    }

    #[tokio::test]
    async fn test_falls_back_to_last_close() {
        let provider = FixtureProvider::new(Some(vec![100.0, 102.0, 101.0, 104.0]), None);
        let outcome = run(&provider, &config()).await.unwrap();

        assert_eq!(provider.point_calls.get(), 1);
        assert_eq!(outcome.price_source, PriceSource::LastClose);
        assert_eq!(outcome.current_price, 104.0);
    }

    #[tokio::test]
    async fn test_malformed_current_price_is_fatal() {
        let provider =
            FixtureProvider::new(Some(vec![100.0, 102.0, 101.0, 104.0]), Some(110.0)).malformed_current();
        let err = run(&provider, &config()).await.unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to read current price"));
        assert_eq!(provider.point_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_no_current_price_date_skips_fetch() {
        let provider = FixtureProvider::new(Some(vec![100.0, 102.0, 101.0]), Some(1.0));
        let cfg = RunConfig {
            current_price_date: None,
            ..config()
        };
        let outcome = run(&provider, &cfg).await.unwrap();

        assert_eq!(provider.point_calls.get(), 0);
        assert_eq!(outcome.current_price, 101.0);
    }

    #[tokio::test]
    async fn test_flat_history_gives_flat_forecast() {
        let provider = FixtureProvider::new(Some(vec![1_000.0, 1_000.0, 1_000.0]), Some(1_000.0));
        let outcome = run(&provider, &config()).await.unwrap();

        assert_eq!(outcome.statistics.mean, 0.0);
        assert_eq!(outcome.statistics.std_dev, 0.0);
        assert!(outcome.result.final_prices.iter().all(|&p| p == 1_000.0));
        assert_eq!(outcome.result.probability_of_profit(), 0.0);
        assert_eq!(outcome.result.probability_of_loss(), 0.0);
    }

    #[tokio::test]
    async fn test_short_history_rejected() {
        let provider = FixtureProvider::new(Some(vec![100.0, 110.0]), Some(100.0));
        assert!(run(&provider, &config()).await.is_err());
        assert_eq!(provider.point_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_runs_are_reproducible() {
        let provider = FixtureProvider::new(Some(vec![100.0, 97.0, 103.0, 99.5, 101.0]), Some(100.0));
        let a = run(&provider, &config()).await.unwrap();
        let b = run(&provider, &config()).await.unwrap();
        assert_eq!(a.result, b.result);
    }
}
