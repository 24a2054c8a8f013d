use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single observed price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Build from an epoch-milliseconds timestamp as returned by the price feed
    pub fn from_millis(timestamp_ms: i64, price: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(timestamp_ms).map(|timestamp| Self { timestamp, price })
    }
}

/// Price history ordered by timestamp ascending
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Convenience for fixtures: one point per day starting at `start`
    pub fn from_daily_prices(start: NaiveDate, prices: &[f64]) -> Self {
        let base = start.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(base + chrono::Duration::days(i as i64), price))
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Last known closing price
    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// Percent change of each point against its predecessor (one fewer than `len`)
    pub fn daily_change_percent(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| (w[1].price - w[0].price) / w[0].price * 100.0)
            .collect()
    }

    /// Keep only the last point of each UTC calendar day
    pub fn daily_closes(&self) -> PriceSeries {
        let mut closes: Vec<PricePoint> = Vec::new();
        for point in &self.points {
            match closes.last_mut() {
                Some(last) if last.timestamp.date_naive() == point.timestamp.date_naive() => {
                    *last = *point;
                }
                _ => closes.push(*point),
            }
        }
        PriceSeries { points: closes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_point_change() {
        let series = PriceSeries::from_daily_prices(date(2024, 11, 1), &[100.0, 110.0]);
        assert_eq!(series.daily_change_percent(), vec![10.0]);
    }

    #[test]
    fn test_single_point_has_no_changes() {
        let series = PriceSeries::from_daily_prices(date(2024, 11, 1), &[100.0]);
        assert!(series.daily_change_percent().is_empty());
        assert_eq!(series.last_price(), Some(100.0));
    }

    #[test]
    fn test_new_sorts_by_timestamp() {
        let a = PricePoint::from_millis(1_730_419_200_000, 1.0).unwrap();
        let b = PricePoint::from_millis(1_730_505_600_000, 2.0).unwrap();
        let series = PriceSeries::new(vec![b, a]);
        assert_eq!(series.prices().collect::<Vec<_>>(), vec![1.0, 2.0]);
        assert_eq!(series.last_price(), Some(2.0));
    }

    #[test]
    fn test_daily_closes_keeps_last_point_per_day() {
        // 2024-11-01 00:00, 12:00, 2024-11-02 06:00
        let points = vec![
            PricePoint::from_millis(1_730_419_200_000, 100.0).unwrap(),
            PricePoint::from_millis(1_730_462_400_000, 105.0).unwrap(),
            PricePoint::from_millis(1_730_527_200_000, 99.0).unwrap(),
        ];
        let closes = PriceSeries::new(points).daily_closes();
        assert_eq!(closes.prices().collect::<Vec<_>>(), vec![105.0, 99.0]);
    }
}
