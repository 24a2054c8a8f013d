use anyhow::{anyhow, ensure, Result};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::statistics::ChangeStatistics;

/// How sampled daily changes are combined into a final price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingMode {
    /// `price * (1 + sum(changes) / 100)`
    #[default]
    Additive,
    /// `price *= 1 + change / 100` for each day
    Multiplicative,
}

impl std::fmt::Display for CompoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Additive => write!(f, "additive"),
            Self::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

/// Parameters of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub horizon_days: usize,
    pub simulation_count: usize,
    pub seed: u64,
    pub compounding: CompoundingMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_days: 3,
            simulation_count: 10_000,
            seed: 42,
            compounding: CompoundingMode::Additive,
        }
    }
}

/// Simulated final prices, in trial order
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub current_price: f64,
    pub final_prices: Vec<f64>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.final_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.final_prices.is_empty()
    }

    /// Fraction of trials ending strictly above the current price
    pub fn probability_of_profit(&self) -> f64 {
        self.fraction(|p| p > self.current_price)
    }

    /// Fraction of trials ending strictly below the current price
    pub fn probability_of_loss(&self) -> f64 {
        self.fraction(|p| p < self.current_price)
    }

    fn fraction(&self, pred: impl Fn(f64) -> bool) -> f64 {
        if self.final_prices.is_empty() {
            return 0.0;
        }
        let hits = self.final_prices.iter().filter(|&&p| pred(p)).count();
        hits as f64 / self.final_prices.len() as f64
    }

    pub fn mean(&self) -> f64 {
        if self.final_prices.is_empty() {
            return f64::NAN;
        }
        self.final_prices.iter().sum::<f64>() / self.final_prices.len() as f64
    }

    pub fn min(&self) -> f64 {
        self.final_prices.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.final_prices.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Linearly interpolated percentile, `p` in [0, 100]
    pub fn percentile(&self, p: f64) -> f64 {
        if self.final_prices.is_empty() {
            return f64::NAN;
        }
        let mut sorted = self.final_prices.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        let weight = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * weight
    }
}

/// Run the Monte Carlo simulation.
///
/// Each trial draws `horizon_days` samples from a normal distribution with the
/// given mean and standard deviation (percent units), trials in index order
/// from a single RNG seeded with `config.seed`.
pub fn simulate(
    current_price: f64,
    stats: &ChangeStatistics,
    config: &SimulationConfig,
) -> Result<SimulationResult> {
    ensure!(
        current_price.is_finite() && current_price > 0.0,
        "Current price must be positive, got {}",
        current_price
    );
    ensure!(stats.mean.is_finite(), "Mean daily change must be finite, got {}", stats.mean);
    ensure!(
        stats.std_dev.is_finite() && stats.std_dev >= 0.0,
        "Standard deviation must be non-negative, got {}",
        stats.std_dev
    );
    ensure!(config.horizon_days > 0, "Horizon must be at least one day");
    ensure!(config.simulation_count > 0, "Simulation count must be positive");

    let dist = Normal::new(stats.mean, stats.std_dev)
        .map_err(|e| anyhow!("Invalid normal distribution: {}", e))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    debug!(
        "Simulating {} trials over {} days ({}, seed {})",
        config.simulation_count, config.horizon_days, config.compounding, config.seed
    );

    let mut final_prices = Vec::with_capacity(config.simulation_count);
    let mut changes = vec![0.0f64; config.horizon_days];

    for _ in 0..config.simulation_count {
        for change in changes.iter_mut() {
            *change = dist.sample(&mut rng);
        }

        let final_price = match config.compounding {
            CompoundingMode::Additive => {
                current_price * (1.0 + changes.iter().sum::<f64>() / 100.0)
            }
            CompoundingMode::Multiplicative => changes
                .iter()
                .fold(current_price, |price, change| price * (1.0 + change / 100.0)),
        };

        final_prices.push(final_price);
    }

    Ok(SimulationResult {
        current_price,
        final_prices,
    })
}
