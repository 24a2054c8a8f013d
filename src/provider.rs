use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::types::PriceSeries;

/// The request itself failed: nothing usable came back from the provider.
///
/// Parse and missing-field errors are not `RequestError`s.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Source of historical and point-in-time prices
#[allow(async_fn_in_trait)]
pub trait PriceProvider {
    /// Fetch the price series between `from` and `to`
    async fn fetch_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<PriceSeries>;

    /// Fetch the price on a calendar date
    async fn fetch_price_on(&self, date: NaiveDate) -> Result<f64>;
}
