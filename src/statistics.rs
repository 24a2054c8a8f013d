//! Descriptive statistics of percent price changes

use crate::types::PriceSeries;

/// Mean and sample standard deviation of the percent change series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeStatistics {
    pub mean: f64,
    pub std_dev: f64,
    /// Number of changes the statistics were computed over
    pub count: usize,
}

impl ChangeStatistics {
    #[cfg(test)]
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev, count: 0 }
    }

    pub fn from_series(series: &PriceSeries) -> Self {
        Self::from_changes(&series.daily_change_percent())
    }

    /// NaN mean for an empty slice, NaN std dev for fewer than two values (n-1 denominator)
    pub fn from_changes(changes: &[f64]) -> Self {
        let count = changes.len();
        if count == 0 {
            return Self { mean: f64::NAN, std_dev: f64::NAN, count };
        }

        let mean = changes.iter().sum::<f64>() / count as f64;
        let std_dev = if count < 2 {
            f64::NAN
        } else {
            let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        };

        Self { mean, std_dev, count }
    }

    pub fn is_defined(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite()
    }
}
