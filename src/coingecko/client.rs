//! CoinGecko API Client
//!
//! HTTP client for the public CoinGecko v3 REST API.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::models::*;
use crate::provider::{PriceProvider, RequestError};
use crate::types::{PricePoint, PriceSeries};

/// Public API base URL
pub const PUBLIC_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying a demo API key
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Date format the history endpoint expects
const HISTORY_DATE_FORMAT: &str = "%d-%m-%Y";

/// CoinGecko price client for one coin quoted in one currency
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    coin_id: String,
    vs_currency: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a client against the public API
    ///
    /// Reads the optional `COINGECKO_API_KEY` environment variable.
    pub fn from_env(coin_id: &str, vs_currency: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let mut this = Self::with_http_client(client, PUBLIC_BASE_URL, coin_id, vs_currency);
        this.api_key = std::env::var("COINGECKO_API_KEY").ok().filter(|k| !k.is_empty());
        Ok(this)
    }

    /// Create a client with explicit configuration
    pub fn with_http_client(
        client: Client,
        base_url: &str,
        coin_id: &str,
        vs_currency: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            coin_id: coin_id.to_string(),
            vs_currency: vs_currency.to_lowercase(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// GET a JSON document, treating anything but 200 as an error
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|source| RequestError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message().map(str::to_string))
                .unwrap_or(body);
            return Err(RequestError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response.text().await.map_err(|source| RequestError::Transport {
            url: url.clone(),
            source,
        })?;

        serde_json::from_str(&body).with_context(|| format!("Failed to parse response from {}", url))
    }
}

impl PriceProvider for CoinGeckoClient {
    async fn fetch_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<PriceSeries> {
        info!("Fetching {} prices in {} from {} to {}", self.coin_id, self.vs_currency, from, to);

        let path = format!("/coins/{}/market_chart/range", self.coin_id);
        let chart: MarketChartResponse = self
            .get_json(
                &path,
                &[
                    ("vs_currency", self.vs_currency.clone()),
                    ("from", from.timestamp().to_string()),
                    ("to", to.timestamp().to_string()),
                ],
            )
            .await?;

        let points = chart
            .prices
            .into_iter()
            .map(|(ts, price)| {
                PricePoint::from_millis(ts, price).ok_or_else(|| anyhow!("Invalid timestamp {}", ts))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Fetched {} price points", points.len());
        Ok(PriceSeries::new(points))
    }

    async fn fetch_price_on(&self, date: NaiveDate) -> Result<f64> {
        let date_str = date.format(HISTORY_DATE_FORMAT).to_string();
        info!("Fetching {} price on {}", self.coin_id, date_str);

        let path = format!("/coins/{}/history", self.coin_id);
        let history: CoinHistoryResponse = self
            .get_json(
                &path,
                &[("date", date_str.clone()), ("localization", "false".to_string())],
            )
            .await?;

        history
            .market_data
            .ok_or_else(|| anyhow!("No market data for {} on {}", self.coin_id, date_str))?
            .current_price
            .get(&self.vs_currency)
            .copied()
            .ok_or_else(|| anyhow!("No {} price for {} on {}", self.vs_currency, self.coin_id, date_str))
    }
}
